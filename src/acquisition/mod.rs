//! Acquisition loops and the status surface
//!
//! This module contains the two producer loops that pull samples from the
//! chassis and the one-shot digital output commander. Each loop runs on its
//! own worker thread, touches only its own sample series, and communicates
//! with the UI exclusively through status events and the shared series.
//!
//! # Components
//!
//! - [`AnalogLoop`] - 4-channel voltage sampling into the analog series
//! - [`DigitalLoop`] - Port-byte sampling into the digital series
//! - [`OutputCommander`] - Pattern write against a fresh output handle
//! - [`StatusEvent`] / [`StatusSender`] - Notifications to the status bar

pub mod analog;
pub mod commander;
pub mod digital;

pub use analog::AnalogLoop;
pub use commander::{pattern_from_selections, OutputCommander};
pub use digital::DigitalLoop;

use crossbeam_channel::{bounded, Receiver, Sender};

/// Capacity of the status channel. Status traffic is sparse; if the UI ever
/// falls this far behind, dropping a note is preferable to blocking a loop.
const STATUS_CHANNEL_CAPACITY: usize = 64;

/// A notification for the status surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusEvent {
    /// Show a message; `is_error` tints the banner
    Note {
        /// Text shown in the status bar
        message: String,
        /// True for failures (configuration or I/O)
        is_error: bool,
    },
    /// Reset the banner to its idle state
    Clear,
}

/// Producer half of the status surface, cloned into every loop and the
/// commander. Sends never block; an overflowing note is dropped.
#[derive(Debug, Clone)]
pub struct StatusSender(Sender<StatusEvent>);

impl StatusSender {
    /// Post an error note
    pub fn error(&self, message: impl Into<String>) {
        self.post(StatusEvent::Note {
            message: message.into(),
            is_error: true,
        });
    }

    /// Post an informational note
    pub fn info(&self, message: impl Into<String>) {
        self.post(StatusEvent::Note {
            message: message.into(),
            is_error: false,
        });
    }

    /// Reset the banner
    pub fn clear(&self) {
        self.post(StatusEvent::Clear);
    }

    fn post(&self, event: StatusEvent) {
        if self.0.try_send(event).is_err() {
            tracing::debug!("Status channel full; note dropped");
        }
    }
}

/// Create the status surface channel pair
pub fn status_channel() -> (StatusSender, Receiver<StatusEvent>) {
    let (tx, rx) = bounded(STATUS_CHANNEL_CAPACITY);
    (StatusSender(tx), rx)
}
