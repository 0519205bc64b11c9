//! Analog acquisition loop
//!
//! One worker thread: configure all four channels (fail-fast on any
//! rejection), clear the series, then read one voltage tuple per iteration
//! and append it with its relative timestamp as a single atomic step, until
//! the run flag leaves `Running` or a read fails. Teardown runs on every
//! exit path.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::buffer::AnalogSeries;
use crate::error::Result;
use crate::hardware::{AnalogInput, Chassis};
use crate::types::{LevelCell, RunFlag, ANALOG_CHANNELS};

use super::StatusSender;

/// The analog producer. Built by the session controller and consumed by
/// `run()` on a dedicated thread.
pub struct AnalogLoop {
    chassis: Arc<dyn Chassis>,
    channels: [String; ANALOG_CHANNELS],
    series: AnalogSeries,
    run: RunFlag,
    origin: Instant,
    status: StatusSender,
    level: LevelCell,
    interval: Duration,
}

impl AnalogLoop {
    /// Assemble a loop for one run.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        chassis: Arc<dyn Chassis>,
        channels: [String; ANALOG_CHANNELS],
        series: AnalogSeries,
        run: RunFlag,
        origin: Instant,
        status: StatusSender,
        level: LevelCell,
        interval: Duration,
    ) -> Self {
        Self {
            chassis,
            channels,
            series,
            run,
            origin,
            status,
            level,
            interval,
        }
    }

    /// Run to completion: Configuring -> Sampling -> Stopping -> Closed.
    pub fn run(self) {
        // Fail-fast: any rejected channel aborts the whole group before a
        // single sample is taken.
        let mut input = match self.chassis.configure_analog(&self.channels) {
            Ok(input) => input,
            Err(e) => {
                tracing::warn!("Analog configuration failed: {e}");
                self.status.error(e.to_string());
                return;
            }
        };

        self.series.clear();
        let outcome = self.sample(input.as_mut());

        // Teardown runs whether sampling ended by flag or by error
        input.close();
        tracing::info!("Analog loop closed");

        if let Err(e) = outcome {
            tracing::warn!("Analog read failed: {e}");
            self.status.error(format!("Analog acquisition stopped: {e}"));
        }
    }

    fn sample(&self, input: &mut dyn AnalogInput) -> Result<()> {
        while self.run.is_running() {
            // Read before taking the timestamp so the pairing reflects the
            // moment the tuple arrived.
            let tuple = input.read()?;
            let timestamp_ms = self.origin.elapsed().as_millis() as u64;
            self.series.push(timestamp_ms, tuple);
            self.level.store(tuple[0]);
            std::thread::sleep(self.interval);
        }
        Ok(())
    }
}
