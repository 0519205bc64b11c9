//! Error handling for the DAQView-RS application
//!
//! This module defines custom error types and a Result alias for use
//! throughout the application.
//!
//! Errors raised at the hardware boundary are caught at the owning
//! acquisition loop or commander and converted into status notifications;
//! they never cross into the render path.

use thiserror::Error;

/// Main error type for DAQView-RS operations
#[derive(Error, Debug)]
pub enum DaqError {
    /// A channel or port identifier was rejected at configure time
    #[error("{channel} not available: {reason}")]
    ChannelUnavailable {
        /// The identifier that failed to configure
        channel: String,
        /// What the chassis (or transport) reported
        reason: String,
    },

    /// Sample depth must be at least 1
    #[error("invalid sample depth {0}: must be at least 1")]
    InvalidSampleDepth(usize),

    /// A blocking read or write failed mid-loop
    #[error("Chassis I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors from the serial transport layer
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// The chassis replied with something the protocol does not allow
    #[error("Malformed chassis response: {0}")]
    Protocol(String),

    /// Errors related to configuration loading
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DaqError {
    /// Build a configure-time rejection for a named channel identifier.
    pub fn channel_unavailable(channel: impl Into<String>, reason: impl Into<String>) -> Self {
        DaqError::ChannelUnavailable {
            channel: channel.into(),
            reason: reason.into(),
        }
    }

    /// True for errors raised at configure time (fail-fast, abort the loop
    /// before any sampling), as opposed to mid-loop I/O failures.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            DaqError::ChannelUnavailable { .. } | DaqError::InvalidSampleDepth(_)
        )
    }
}

/// Result type alias for DAQView-RS operations
pub type Result<T> = std::result::Result<T, DaqError>;
