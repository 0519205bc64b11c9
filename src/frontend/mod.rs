//! Console frontend
//!
//! The UI is a caller of the session controller, not part of the pipeline:
//! the Run/Stop toggle maps to `start()`/`stop()`, the radio pairs trigger
//! the output commander, and every frame the render consumer snapshots both
//! series and redraws the two plot surfaces. Repaints are scheduled on the
//! render interval while running, so the consumer stays on its own clock
//! regardless of producer timing.

pub mod plots;

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::Receiver;
use egui::{Color32, RichText};

use crate::acquisition::{status_channel, OutputCommander, StatusEvent};
use crate::buffer::{AnalogSeries, DigitalSeries};
use crate::config::AppConfig;
use crate::hardware::Chassis;
use crate::render::assemble_frame;
use crate::session::{RunRequest, SessionController};
use crate::types::{DeviceInfo, LevelCell, ANALOG_CHANNELS, DIGITAL_OUTPUT_LINES};

/// Status bar tint for error notes
const ERROR_TINT: Color32 = Color32::from_rgb(255, 255, 150);

/// Run button tint while sampling
const RUNNING_TINT: Color32 = Color32::from_rgb(0, 200, 0);

/// Repaint period while idle; keeps the status bar and device table live
/// without burning frames.
const IDLE_REPAINT: Duration = Duration::from_millis(100);

/// The console application
pub struct DaqConsoleApp {
    chassis: Arc<dyn Chassis>,
    controller: SessionController,
    commander: OutputCommander,
    status_rx: Receiver<StatusEvent>,

    analog: AnalogSeries,
    digital: DigitalSeries,
    level: LevelCell,
    render_interval: Duration,

    devices: Vec<DeviceInfo>,
    selected_device: Option<usize>,

    // Editable channel identifiers; validated only by the chassis at start
    analog_fields: [String; ANALOG_CHANNELS],
    digital_input_field: String,
    digital_output_field: String,
    depth_field: String,
    output_lines: [bool; DIGITAL_OUTPUT_LINES],

    banner: Option<(String, bool)>,
}

impl DaqConsoleApp {
    /// Build the console around a chassis driver.
    pub fn new(chassis: Arc<dyn Chassis>, config: AppConfig) -> Self {
        let (status_tx, status_rx) = status_channel();
        let controller = SessionController::new(
            Arc::clone(&chassis),
            status_tx.clone(),
            config.capture.clone(),
        );
        let commander = OutputCommander::new(Arc::clone(&chassis), status_tx);
        let devices = chassis.list_devices();

        Self {
            analog: controller.analog_series(),
            digital: controller.digital_series(),
            level: controller.level_cell(),
            render_interval: config.capture.render_interval(),
            controller,
            commander,
            status_rx,
            chassis,
            devices,
            selected_device: None,
            analog_fields: config.channels.analog.clone(),
            digital_input_field: config.channels.digital_input.clone(),
            digital_output_field: config.channels.digital_output.clone(),
            depth_field: config.capture.sample_depth.to_string(),
            output_lines: [false; DIGITAL_OUTPUT_LINES],
            banner: None,
        }
    }

    fn drain_status(&mut self) {
        while let Ok(event) = self.status_rx.try_recv() {
            match event {
                StatusEvent::Note { message, is_error } => {
                    self.banner = Some((message, is_error));
                }
                StatusEvent::Clear => self.banner = None,
            }
        }
    }

    fn toggle_run(&mut self) {
        if self.controller.state() != crate::types::RunState::Stopped {
            self.controller.stop();
            // The message may stay, but the error tint does not survive a
            // deliberate stop
            if let Some((_, is_error)) = self.banner.as_mut() {
                *is_error = false;
            }
            return;
        }

        let depth = match self.depth_field.trim().parse::<usize>() {
            Ok(depth) => depth,
            Err(_) => {
                self.banner = Some((
                    format!("invalid sample depth {:?}", self.depth_field.trim()),
                    true,
                ));
                return;
            }
        };

        let request = RunRequest {
            analog_channels: self.analog_fields.clone(),
            digital_input: self.digital_input_field.clone(),
            sample_depth: depth,
        };
        match self.controller.start(&request) {
            Ok(()) => self.banner = None,
            Err(e) => self.banner = Some((e.to_string(), true)),
        }
    }

    fn device_table(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.heading("Chassis Modules");
        egui::ScrollArea::vertical()
            .max_height(120.0)
            .show(ui, |ui| {
                egui::Grid::new("device_table").striped(true).show(ui, |ui| {
                    for (index, device) in self.devices.iter().enumerate() {
                        let selected = self.selected_device == Some(index);
                        if ui.selectable_label(selected, &device.name).clicked() {
                            self.selected_device = Some(index);
                        }
                        ui.label(&device.product);
                        ui.label(device.serial.as_deref().unwrap_or("-"));
                        ui.end_row();
                    }
                });
            });
        ui.horizontal(|ui| {
            if ui.button("Copy Device Name").clicked() {
                if let Some(device) = self
                    .selected_device
                    .and_then(|index| self.devices.get(index))
                {
                    ctx.copy_text(device.name.clone());
                }
            }
            if ui.button("Update").clicked() {
                self.devices = self.chassis.list_devices();
                self.selected_device = None;
            }
        });
    }

    fn controls(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        self.device_table(ui, ctx);
        ui.separator();

        for field in &mut self.analog_fields {
            ui.text_edit_singleline(field);
        }
        ui.separator();
        ui.text_edit_singleline(&mut self.digital_input_field);

        ui.separator();
        ui.vertical_centered(|ui| {
            ui.label("AI -10 to +10 V");
            let level = self.level.load();
            let fraction = (((level + 10.0) / 20.0) as f32).clamp(0.0, 1.0);
            ui.add(egui::ProgressBar::new(fraction).text(format!("{level:+.2} V")));
        });

        ui.separator();
        ui.horizontal(|ui| {
            ui.label("Sample Depth");
            ui.add(egui::TextEdit::singleline(&mut self.depth_field).desired_width(60.0));
            let mut button = egui::Button::new("Run / Stop");
            if self.controller.is_running() {
                button = button.fill(RUNNING_TINT);
            }
            if ui.add(button).clicked() {
                self.toggle_run();
            }
        });

        ui.separator();
        ui.text_edit_singleline(&mut self.digital_output_field);
        let mut changed = false;
        for (index, line) in self.output_lines.iter_mut().enumerate() {
            ui.horizontal(|ui| {
                ui.label(format!("line{index}"));
                changed |= ui.radio_value(line, false, "Low").changed();
                changed |= ui.radio_value(line, true, "High").changed();
            });
        }
        if changed {
            // Fresh handle per event; runs concurrently with acquisition
            self.commander
                .send_detached(self.digital_output_field.clone(), self.output_lines);
        }
    }

    fn status_bar(&self, ui: &mut egui::Ui) {
        match &self.banner {
            Some((message, true)) => {
                egui::Frame::new().fill(ERROR_TINT).show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.label(RichText::new(message).color(Color32::BLACK));
                });
            }
            Some((message, false)) => {
                ui.label(message);
            }
            None => {
                ui.label(self.controller.state().to_string());
            }
        }
    }
}

impl eframe::App for DaqConsoleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_status();

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            self.status_bar(ui);
        });

        egui::SidePanel::right("controls")
            .resizable(false)
            .show(ctx, |ui| {
                self.controls(ui, ctx);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            // The render consumer: snapshot both series, redraw both
            // surfaces. Best effort; frames are dropped, never queued.
            let frame = assemble_frame(&self.analog.snapshot(), &self.digital.snapshot());
            let plot_height = (ui.available_height() - ui.spacing().item_spacing.y) / 2.0;
            plots::analog_plot(ui, &frame, &self.analog_fields, plot_height);
            plots::digital_plot(ui, &frame, plot_height);
        });

        let repaint_after = if self.controller.is_running() {
            self.render_interval
        } else {
            IDLE_REPAINT
        };
        ctx.request_repaint_after(repaint_after);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        // An acquisition loop must not outlive its hardware handle
        self.controller.stop();
    }
}
