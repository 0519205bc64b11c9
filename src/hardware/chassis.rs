//! Chassis traits: the contract between the core and the hardware
//!
//! A [`Chassis`] hands out independent task handles, one per configure call.
//! Handles never share transport state, so the analog loop, the digital loop
//! and the output commander can hold theirs concurrently without
//! interference. Configure calls validate identifiers and fail fast; reads
//! are synchronous and blocking, one sample per call.
//!
//! `close` must be safe to call exactly once on every exit path, including
//! after a failed read; implementations treat it as best-effort teardown and
//! must not panic.

use crate::error::Result;
use crate::types::{DeviceInfo, ANALOG_CHANNELS};

/// Factory for task handles against one physical chassis.
///
/// Shared as `Arc<dyn Chassis>` between the session controller, the two
/// acquisition loops and the commander; `configure_*` therefore takes
/// `&self` and each call opens its own transport handle.
#[cfg_attr(test, mockall::automock)]
pub trait Chassis: Send + Sync {
    /// Enumerate chassis modules for the device table.
    ///
    /// Listing is display-only; a device can disappear between listing and
    /// configure, which then fails with `ChannelUnavailable`.
    fn list_devices(&self) -> Vec<DeviceInfo>;

    /// Register a group of analog input channels and arm them for reading.
    ///
    /// All-or-nothing: the first identifier the chassis rejects aborts the
    /// whole group and is named in the returned error. No handle is left
    /// open on failure.
    fn configure_analog(&self, channels: &[String; ANALOG_CHANNELS])
        -> Result<Box<dyn AnalogInput>>;

    /// Register one multi-line digital input port.
    fn configure_digital_input(&self, port: &str) -> Result<Box<dyn DigitalInput>>;

    /// Register one digital output port for a single write.
    fn configure_digital_output(&self, port: &str) -> Result<Box<dyn DigitalOutput>>;
}

/// An armed analog channel group
#[cfg_attr(test, mockall::automock)]
pub trait AnalogInput: Send {
    /// Block until the chassis delivers one sample tuple, one value per
    /// configured channel.
    fn read(&mut self) -> Result<[f64; ANALOG_CHANNELS]>;

    /// Tear down the handle. Idempotent, best-effort.
    fn close(&mut self);
}

/// An armed digital input port
#[cfg_attr(test, mockall::automock)]
pub trait DigitalInput: Send {
    /// Block until the chassis delivers one port byte.
    fn read(&mut self) -> Result<u8>;

    /// Tear down the handle. Idempotent, best-effort.
    fn close(&mut self);
}

/// An armed digital output port
#[cfg_attr(test, mockall::automock)]
pub trait DigitalOutput: Send {
    /// Drive the port lines to the given bit pattern.
    fn write(&mut self, pattern: u8) -> Result<()>;

    /// Tear down the handle. Idempotent, best-effort.
    fn close(&mut self);
}
