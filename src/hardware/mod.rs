//! Hardware boundary for the DAQ chassis
//!
//! Everything the core knows about the physical chassis goes through the
//! object-safe traits in [`chassis`]: a configure call yields a task handle,
//! task reads block for one sample, and `close` tears the handle down. The
//! acquisition loops, the commander and the tests all program against these
//! traits, never against a concrete transport.
//!
//! # Implementations
//!
//! - [`SerialChassis`] - Real hardware over a line-oriented serial protocol
//! - `SimChassis` - Deterministic simulator (requires the `mock-chassis`
//!   feature), for running the console without a chassis attached

pub mod chassis;
pub mod serial;
#[cfg(feature = "mock-chassis")]
pub mod sim;

pub use chassis::{AnalogInput, Chassis, DigitalInput, DigitalOutput};
pub use serial::SerialChassis;
#[cfg(feature = "mock-chassis")]
pub use sim::SimChassis;
