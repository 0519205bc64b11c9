//! Digital output commander
//!
//! Stateless per invocation: derive the bit pattern from the current line
//! selections, open a fresh output handle, write the pattern exactly once,
//! tear the handle down. A rejected port identifier aborts before any write
//! and surfaces on the status bar. The handle targets a disjoint output
//! port, so commands may run while acquisition is live.

use std::sync::Arc;

use crate::hardware::{Chassis, DigitalOutput};
use crate::types::DIGITAL_OUTPUT_LINES;

use super::StatusSender;

/// Fold per-line High/Low selections into a bit pattern, line 0 at bit 0.
pub fn pattern_from_selections(selections: &[bool]) -> u8 {
    selections
        .iter()
        .enumerate()
        .fold(0u8, |mask, (index, &high)| {
            if high {
                mask | (1 << index)
            } else {
                mask
            }
        })
}

/// One-shot writer for the digital output port
#[derive(Clone)]
pub struct OutputCommander {
    chassis: Arc<dyn Chassis>,
    status: StatusSender,
}

impl OutputCommander {
    /// Create a commander bound to the chassis and the status surface
    pub fn new(chassis: Arc<dyn Chassis>, status: StatusSender) -> Self {
        Self { chassis, status }
    }

    /// Perform one configure/write/teardown cycle against `port`.
    pub fn send(&self, port: &str, selections: &[bool; DIGITAL_OUTPUT_LINES]) {
        let pattern = pattern_from_selections(selections);

        let mut output = match self.chassis.configure_digital_output(port) {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!("Digital output configuration failed: {e}");
                self.status.error(e.to_string());
                return;
            }
        };

        match output.write(pattern) {
            Ok(()) => tracing::debug!("Digital output pattern {pattern:#06b} on {port}"),
            Err(e) => {
                tracing::warn!("Digital output write failed: {e}");
                self.status.error(format!("Digital output failed: {e}"));
            }
        }

        output.close();
    }

    /// Run one cycle on a short-lived worker thread so a slow chassis never
    /// stalls the UI.
    pub fn send_detached(&self, port: String, selections: [bool; DIGITAL_OUTPUT_LINES]) {
        let commander = self.clone();
        std::thread::spawn(move || commander.send(&port, &selections));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquisition::{status_channel, StatusEvent};
    use crate::hardware::chassis::{MockChassis, MockDigitalOutput};

    #[test]
    fn test_pattern_from_selections() {
        assert_eq!(pattern_from_selections(&[true, false, true, false]), 0b0101);
        assert_eq!(pattern_from_selections(&[false; 4]), 0);
        assert_eq!(pattern_from_selections(&[true; 4]), 0b1111);
        assert_eq!(pattern_from_selections(&[false, true]), 0b0010);
    }

    #[test]
    fn test_write_attempted_exactly_once() {
        let mut chassis = MockChassis::new();
        chassis
            .expect_configure_digital_output()
            .times(1)
            .returning(|_| {
                let mut output = MockDigitalOutput::new();
                output
                    .expect_write()
                    .times(1)
                    .withf(|pattern| *pattern == 0b0101)
                    .returning(|_| Ok(()));
                output.expect_close().times(1).return_const(());
                Ok(Box::new(output))
            });

        let (status, _rx) = status_channel();
        let commander = OutputCommander::new(Arc::new(chassis), status);
        commander.send("cDAQ1Mod7/port0/line0:3", &[true, false, true, false]);
    }

    #[test]
    fn test_bad_port_aborts_without_write() {
        let mut chassis = MockChassis::new();
        chassis
            .expect_configure_digital_output()
            .times(1)
            .returning(|port| {
                Err(crate::error::DaqError::channel_unavailable(
                    port,
                    "module absent",
                ))
            });

        let (status, rx) = status_channel();
        let commander = OutputCommander::new(Arc::new(chassis), status);
        commander.send("cDAQ1Mod9/port0/line0:3", &[true; 4]);

        match rx.try_recv().unwrap() {
            StatusEvent::Note { message, is_error } => {
                assert!(is_error);
                assert!(message.contains("cDAQ1Mod9/port0/line0:3"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
