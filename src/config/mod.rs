//! Configuration for DAQView-RS
//!
//! Settings are read once at startup from an optional `daqview.toml` next to
//! the working directory and are never written back; channel identifiers and
//! sample depth remain editable in the UI for the duration of the process.

mod settings;

pub use settings::{AppConfig, CaptureConfig, ChannelConfig, TransportConfig, CONFIG_FILE_NAME};
