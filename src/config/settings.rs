//! Application configuration loaded at startup
//!
//! # Main Types
//!
//! - [`AppConfig`] - Top-level configuration (transport + channels + capture)
//! - [`TransportConfig`] - Serial link to the chassis
//! - [`ChannelConfig`] - The channel and port identifiers to acquire from
//! - [`CaptureConfig`] - Sample depth and loop/render pacing
//!
//! Channel identifiers are opaque strings; only the chassis validates them,
//! and only at configure time.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{DaqError, Result};
use crate::types::ANALOG_CHANNELS;

/// File name probed in the working directory at startup
pub const CONFIG_FILE_NAME: &str = "daqview.toml";

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Serial link to the chassis
    pub transport: TransportConfig,
    /// Channel and port identifiers
    pub channels: ChannelConfig,
    /// Sampling and rendering cadence
    pub capture: CaptureConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|e| DaqError::Config(format!("{}: {e}", path.display())))
    }

    /// Load `daqview.toml` from the working directory if present, defaults
    /// otherwise. A malformed file is an error; a missing one is not.
    pub fn load_or_default() -> Result<Self> {
        let path = Path::new(CONFIG_FILE_NAME);
        if path.exists() {
            tracing::info!("Loading configuration from {CONFIG_FILE_NAME}");
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

/// Serial link settings for the chassis
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Serial port device path
    pub port: String,
    /// Baud rate
    pub baud_rate: u32,
    /// Per-read timeout in milliseconds. The read contract itself is
    /// blocking; this bound exists so a stalled chassis surfaces as an I/O
    /// error instead of wedging an acquisition loop forever.
    pub read_timeout_ms: u64,
    /// Use the simulated chassis instead of real hardware
    /// (requires the `mock-chassis` feature)
    pub simulate: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            baud_rate: 115_200,
            read_timeout_ms: 1_000,
            simulate: false,
        }
    }
}

impl TransportConfig {
    /// Read timeout as a [`Duration`]
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

fn default_port() -> String {
    if cfg!(windows) {
        "COM3".to_string()
    } else {
        "/dev/ttyUSB0".to_string()
    }
}

/// Channel and port identifiers, validated only by the chassis
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Analog input channels, one per plot trace
    pub analog: [String; ANALOG_CHANNELS],
    /// Digital input port (read as one byte per sample)
    pub digital_input: String,
    /// Digital output port driven by the commander
    pub digital_output: String,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            analog: [
                "cDAQ1Mod1/ai0".to_string(),
                "cDAQ1Mod1/ai1".to_string(),
                "cDAQ1Mod5/ai0".to_string(),
                "cDAQ1Mod5/ai1".to_string(),
            ],
            digital_input: "cDAQ1Mod6/port0/line0:7".to_string(),
            digital_output: "cDAQ1Mod7/port0/line0:3".to_string(),
        }
    }
}

/// Sampling depth and pacing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Most-recent samples retained per series (FIFO eviction bound)
    pub sample_depth: usize,
    /// Pause between analog reads, bounding the polling rate
    pub analog_interval_ms: u64,
    /// Pause between digital reads
    pub digital_interval_ms: u64,
    /// Render consumer tick period
    pub render_interval_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            sample_depth: 100,
            analog_interval_ms: 10,
            digital_interval_ms: 10,
            render_interval_ms: 10,
        }
    }
}

impl CaptureConfig {
    /// Analog loop pacing as a [`Duration`]
    pub fn analog_interval(&self) -> Duration {
        Duration::from_millis(self.analog_interval_ms)
    }

    /// Digital loop pacing as a [`Duration`]
    pub fn digital_interval(&self) -> Duration {
        Duration::from_millis(self.digital_interval_ms)
    }

    /// Render tick period as a [`Duration`]
    pub fn render_interval(&self) -> Duration {
        Duration::from_millis(self.render_interval_ms)
    }
}
