//! Render-frame assembly for the plot surfaces
//!
//! The render consumer runs on its own clock, decoupled from producer
//! timing: each tick snapshots both series and rebuilds every trace from
//! scratch. Frames are best-effort; a slow consumer drops frames, it never
//! queues them. This module is the pure half of that work (snapshot ->
//! plottable point lists); the egui side in `frontend::plots` only draws.
//!
//! No interpolation, no resampling: every (timestamp, value) pair becomes
//! one plot point, so visual density reflects the actual acquisition rate.

use crate::buffer::SeriesSnapshot;
use crate::types::{ANALOG_CHANNELS, DIGITAL_PLOT_BITS};

/// All traces for one render tick
#[derive(Debug, Clone, Default)]
pub struct PlotFrame {
    /// One voltage trace per analog channel, x in ms, y in volts
    pub analog: Vec<Vec<[f64; 2]>>,
    /// One decoded trace per digital bit, offset vertically by bit index
    pub digital: Vec<Vec<[f64; 2]>>,
}

impl PlotFrame {
    /// True when neither series held any samples at snapshot time
    pub fn is_empty(&self) -> bool {
        self.analog.iter().all(Vec::is_empty) && self.digital.iter().all(Vec::is_empty)
    }
}

/// Build the frame for one tick from fresh snapshots.
pub fn assemble_frame(
    analog: &SeriesSnapshot<[f64; ANALOG_CHANNELS]>,
    digital: &SeriesSnapshot<u8>,
) -> PlotFrame {
    PlotFrame {
        analog: (0..ANALOG_CHANNELS)
            .map(|lane| analog_trace(analog, lane))
            .collect(),
        digital: (0..DIGITAL_PLOT_BITS)
            .map(|bit| digital_bit_trace(digital, bit))
            .collect(),
    }
}

/// Extract one analog lane as (ms, volts) plot points.
pub fn analog_trace(
    snapshot: &SeriesSnapshot<[f64; ANALOG_CHANNELS]>,
    lane: usize,
) -> Vec<[f64; 2]> {
    snapshot
        .timestamps
        .iter()
        .zip(&snapshot.values)
        .map(|(&t, row)| [t as f64, row[lane]])
        .collect()
}

/// Decode one bit position from every port byte.
///
/// A set bit plots at `bit_index + 0.5`, a clear bit at `bit_index`, giving
/// each line its own vertical band.
pub fn digital_bit_trace(snapshot: &SeriesSnapshot<u8>, bit: usize) -> Vec<[f64; 2]> {
    snapshot
        .timestamps
        .iter()
        .zip(&snapshot.values)
        .map(|(&t, &byte)| {
            let level = f64::from((byte >> bit) & 1);
            [t as f64, bit as f64 + 0.5 * level]
        })
        .collect()
}
