//! Digital acquisition loop
//!
//! Same state machine as the analog loop, with exactly one channel group (a
//! single multi-line input port) and a one-byte read per iteration. The two
//! loops share nothing but the run flag: independent hardware handle,
//! independent series, independent eviction.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::buffer::DigitalSeries;
use crate::error::Result;
use crate::hardware::{Chassis, DigitalInput};
use crate::types::RunFlag;

use super::StatusSender;

/// The digital producer. Built by the session controller and consumed by
/// `run()` on a dedicated thread.
pub struct DigitalLoop {
    chassis: Arc<dyn Chassis>,
    port: String,
    series: DigitalSeries,
    run: RunFlag,
    origin: Instant,
    status: StatusSender,
    interval: Duration,
}

impl DigitalLoop {
    /// Assemble a loop for one run.
    pub fn new(
        chassis: Arc<dyn Chassis>,
        port: String,
        series: DigitalSeries,
        run: RunFlag,
        origin: Instant,
        status: StatusSender,
        interval: Duration,
    ) -> Self {
        Self {
            chassis,
            port,
            series,
            run,
            origin,
            status,
            interval,
        }
    }

    /// Run to completion: Configuring -> Sampling -> Stopping -> Closed.
    pub fn run(self) {
        let mut input = match self.chassis.configure_digital_input(&self.port) {
            Ok(input) => input,
            Err(e) => {
                tracing::warn!("Digital configuration failed: {e}");
                self.status.error(e.to_string());
                return;
            }
        };

        self.series.clear();
        let outcome = self.sample(input.as_mut());

        input.close();
        tracing::info!("Digital loop closed");

        if let Err(e) = outcome {
            tracing::warn!("Digital read failed: {e}");
            self.status
                .error(format!("Digital acquisition stopped: {e}"));
        }
    }

    fn sample(&self, input: &mut dyn DigitalInput) -> Result<()> {
        while self.run.is_running() {
            let byte = input.read()?;
            let timestamp_ms = self.origin.elapsed().as_millis() as u64;
            self.series.push(timestamp_ms, byte);
            std::thread::sleep(self.interval);
        }
        Ok(())
    }
}
