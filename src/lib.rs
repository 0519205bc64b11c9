//! # DAQView-RS: Multi-Module DAQ Chassis Console
//!
//! A live instrument console that continuously samples analog and digital
//! channels from a data-acquisition chassis and renders them as scrolling
//! time-series plots, with Run/Stop control and on-demand digital output.
//!
//! ## Architecture
//!
//! - **Hardware**: An opaque chassis driver behind object-safe traits; the
//!   real transport is a line-oriented serial protocol, a simulator is
//!   available behind the `mock-chassis` feature
//! - **Acquisition**: Two independent producer threads (analog 4-channel
//!   tuples, digital port bytes) appending into depth-bounded, mutex-guarded
//!   sample series with FIFO eviction
//! - **Session**: A controller owning the tri-state run flag, the timestamp
//!   origin and the worker lifecycles; cancellation is cooperative
//! - **Frontend**: eframe/egui with egui_plot, acting as the
//!   independently-clocked render consumer (snapshot both series each tick,
//!   redraw both surfaces, drop frames rather than queue them)
//!
//! Producers and the renderer communicate only through the sample series;
//! failures surface on a crossbeam status channel, never across the data
//! path.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use daqview_rs::acquisition::status_channel;
//! use daqview_rs::config::AppConfig;
//! use daqview_rs::hardware::SerialChassis;
//! use daqview_rs::session::{RunRequest, SessionController};
//!
//! let config = AppConfig::load_or_default()?;
//! let chassis = Arc::new(SerialChassis::new(&config.transport));
//! let (status_tx, status_rx) = status_channel();
//! let mut session = SessionController::new(chassis, status_tx, config.capture.clone());
//!
//! session.start(&RunRequest {
//!     analog_channels: config.channels.analog.clone(),
//!     digital_input: config.channels.digital_input.clone(),
//!     sample_depth: 100,
//! })?;
//!
//! let snapshot = session.analog_series().snapshot();
//! session.stop();
//! ```

pub mod acquisition;
pub mod buffer;
pub mod config;
pub mod error;
pub mod frontend;
pub mod hardware;
pub mod render;
pub mod session;
pub mod types;

// Re-export commonly used types
pub use acquisition::{OutputCommander, StatusEvent};
pub use buffer::{AnalogSeries, DigitalSeries, SampleSeries, SeriesSnapshot, SharedSeries};
pub use config::AppConfig;
pub use error::{DaqError, Result};
pub use frontend::DaqConsoleApp;
pub use hardware::{Chassis, SerialChassis};
pub use session::{RunRequest, SessionController};
pub use types::{DeviceInfo, RunFlag, RunState};
