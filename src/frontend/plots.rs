//! Plot surfaces for the console
//!
//! Two independent redraws per render tick: the analog surface (one line
//! per channel) and the digital surface (one decoded band per bit). Both
//! draw whatever the current frame holds; an empty frame draws empty axes.

use egui::Ui;
use egui_plot::{Corner, Legend, Line, Plot, PlotPoints};

use crate::render::PlotFrame;
use crate::types::{ANALOG_CHANNELS, DIGITAL_PLOT_BITS};

/// Draw the analog surface: one voltage trace per configured channel.
pub fn analog_plot(ui: &mut Ui, frame: &PlotFrame, labels: &[String; ANALOG_CHANNELS], height: f32) {
    Plot::new("analog_plot")
        .height(height)
        .x_axis_label("Time (ms)")
        .y_axis_label("Voltage (V)")
        .legend(Legend::default().position(Corner::RightTop))
        .show(ui, |plot_ui| {
            for (label, trace) in labels.iter().zip(&frame.analog) {
                plot_ui.line(Line::new(label, PlotPoints::from(trace.clone())));
            }
        });
}

/// Draw the digital surface: one vertical band per decoded bit.
pub fn digital_plot(ui: &mut Ui, frame: &PlotFrame, height: f32) {
    Plot::new("digital_plot")
        .height(height)
        .x_axis_label("Time (ms)")
        .include_y(-0.5)
        .include_y(DIGITAL_PLOT_BITS as f64)
        .legend(Legend::default().position(Corner::RightTop))
        .show(ui, |plot_ui| {
            for (bit, trace) in frame.digital.iter().enumerate() {
                plot_ui.line(Line::new(
                    format!("line{bit}"),
                    PlotPoints::from(trace.clone()),
                ));
            }
        });
}
