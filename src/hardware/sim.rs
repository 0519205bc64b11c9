//! Simulated chassis for running without hardware
//!
//! Generates deterministic waveforms: each analog channel is a sine at a
//! channel-specific frequency inside the -10..+10 V range, and the digital
//! port walks a bit pattern so every decoded trace visibly toggles.
//!
//! Identifiers containing `"missing"` are rejected at configure time, which
//! makes the fail-fast path reachable from the UI during manual testing.
//!
//! # Enabling
//!
//! The simulator is only available when the `mock-chassis` feature is
//! enabled:
//!
//! ```bash
//! cargo run --features mock-chassis
//! ```

use std::time::Instant;

use crate::error::{DaqError, Result};
use crate::types::{DeviceInfo, ANALOG_CHANNELS};

use super::chassis::{AnalogInput, Chassis, DigitalInput, DigitalOutput};

/// Marker substring that makes an identifier fail to configure
const UNAVAILABLE_MARKER: &str = "missing";

/// Simulated chassis
pub struct SimChassis {
    epoch: Instant,
}

impl SimChassis {
    /// Create a simulator; waveform phase starts at construction time.
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }

    fn reject_unavailable(identifier: &str) -> Result<()> {
        if identifier.contains(UNAVAILABLE_MARKER) {
            Err(DaqError::channel_unavailable(
                identifier,
                "simulated module absent",
            ))
        } else {
            Ok(())
        }
    }
}

impl Default for SimChassis {
    fn default() -> Self {
        Self::new()
    }
}

impl Chassis for SimChassis {
    fn list_devices(&self) -> Vec<DeviceInfo> {
        vec![
            DeviceInfo {
                name: "simMod1".into(),
                product: "Sim AI (4ch)".into(),
                serial: Some("SIM0001".into()),
            },
            DeviceInfo {
                name: "simMod6".into(),
                product: "Sim DI (8 line)".into(),
                serial: Some("SIM0006".into()),
            },
            DeviceInfo {
                name: "simMod7".into(),
                product: "Sim DO (4 line)".into(),
                serial: Some("SIM0007".into()),
            },
        ]
    }

    fn configure_analog(
        &self,
        channels: &[String; ANALOG_CHANNELS],
    ) -> Result<Box<dyn AnalogInput>> {
        for channel in channels {
            Self::reject_unavailable(channel)?;
        }
        Ok(Box::new(SimAnalogTask { epoch: self.epoch }))
    }

    fn configure_digital_input(&self, port: &str) -> Result<Box<dyn DigitalInput>> {
        Self::reject_unavailable(port)?;
        Ok(Box::new(SimDigitalInTask { epoch: self.epoch }))
    }

    fn configure_digital_output(&self, port: &str) -> Result<Box<dyn DigitalOutput>> {
        Self::reject_unavailable(port)?;
        Ok(Box::new(SimDigitalOutTask))
    }
}

struct SimAnalogTask {
    epoch: Instant,
}

impl AnalogInput for SimAnalogTask {
    fn read(&mut self) -> Result<[f64; ANALOG_CHANNELS]> {
        let t = self.epoch.elapsed().as_secs_f64();
        let mut tuple = [0.0; ANALOG_CHANNELS];
        for (i, value) in tuple.iter_mut().enumerate() {
            let freq = 0.5 + i as f64 * 0.4;
            *value = 9.0 * (std::f64::consts::TAU * freq * t).sin();
        }
        Ok(tuple)
    }

    fn close(&mut self) {}
}

struct SimDigitalInTask {
    epoch: Instant,
}

impl DigitalInput for SimDigitalInTask {
    fn read(&mut self) -> Result<u8> {
        // Walk one set bit per ~250 ms so each decoded trace toggles
        let step = self.epoch.elapsed().as_millis() / 250;
        Ok(1u8 << (step % 8) as u8)
    }

    fn close(&mut self) {}
}

struct SimDigitalOutTask;

impl DigitalOutput for SimDigitalOutTask {
    fn write(&mut self, pattern: u8) -> Result<()> {
        tracing::info!("Simulated digital output: {pattern:#06b}");
        Ok(())
    }

    fn close(&mut self) {}
}
