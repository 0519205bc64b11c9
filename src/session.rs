//! Session controller: start/stop lifecycle for the acquisition pipeline
//!
//! Owns the run flag, the per-run timestamp origin and the worker thread
//! handles. The UI is a plain caller of [`SessionController::start`] and
//! [`SessionController::stop`]; it never touches the loops directly.
//!
//! # Shutdown semantics
//!
//! `stop()` flips the run flag and waits a bounded grace period for both
//! loops to finish their current iteration and tear down. This is a soft
//! shutdown: a loop wedged inside a blocking hardware read is left to
//! finish on its own (its handle is dropped, the thread is not joined), so
//! shutdown latency is bounded by the grace period, not by the read. The
//! serial transport's read timeout keeps such a thread from living forever.

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::acquisition::{AnalogLoop, DigitalLoop, StatusSender};
use crate::buffer::{AnalogSeries, DigitalSeries, SharedSeries};
use crate::config::CaptureConfig;
use crate::error::{DaqError, Result};
use crate::hardware::Chassis;
use crate::types::{LevelCell, RunFlag, RunState, ANALOG_CHANNELS};

/// Grace period for the loops to observe the flag and tear down
const STOP_GRACE: Duration = Duration::from_millis(100);

/// Polling step while waiting out the grace period
const STOP_POLL: Duration = Duration::from_millis(5);

/// Per-run inputs captured from the UI at start time
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// Analog channel identifiers, one per trace
    pub analog_channels: [String; ANALOG_CHANNELS],
    /// Digital input port identifier
    pub digital_input: String,
    /// FIFO eviction bound for both series
    pub sample_depth: usize,
}

/// Owner of the acquisition lifecycle
pub struct SessionController {
    chassis: Arc<dyn Chassis>,
    run: RunFlag,
    analog: AnalogSeries,
    digital: DigitalSeries,
    level: LevelCell,
    status: StatusSender,
    capture: CaptureConfig,
    workers: Vec<JoinHandle<()>>,
}

impl SessionController {
    /// Create a controller in the Stopped state.
    pub fn new(chassis: Arc<dyn Chassis>, status: StatusSender, capture: CaptureConfig) -> Self {
        let depth = capture.sample_depth;
        Self {
            chassis,
            run: RunFlag::new(),
            analog: SharedSeries::with_depth(depth),
            digital: SharedSeries::with_depth(depth),
            level: LevelCell::new(),
            status,
            capture,
            workers: Vec::new(),
        }
    }

    /// Start a run: validate the request, capture the timestamp origin,
    /// flip the flag to Running and spawn both acquisition loops.
    ///
    /// Rejects a zero sample depth before anything is spawned. Starting
    /// while already running is a no-op.
    pub fn start(&mut self, request: &RunRequest) -> Result<()> {
        if self.run.state() != RunState::Stopped {
            tracing::debug!("start() ignored; session already active");
            return Ok(());
        }
        if request.sample_depth == 0 {
            return Err(DaqError::InvalidSampleDepth(request.sample_depth));
        }

        // A new run begins with a clean banner; failures from the previous
        // run no longer apply.
        self.status.clear();

        self.analog.set_depth(request.sample_depth);
        self.digital.set_depth(request.sample_depth);

        let origin = Instant::now();
        self.run.set_running();

        let analog_loop = AnalogLoop::new(
            Arc::clone(&self.chassis),
            request.analog_channels.clone(),
            self.analog.clone(),
            self.run.clone(),
            origin,
            self.status.clone(),
            self.level.clone(),
            self.capture.analog_interval(),
        );
        let digital_loop = DigitalLoop::new(
            Arc::clone(&self.chassis),
            request.digital_input.clone(),
            self.digital.clone(),
            self.run.clone(),
            origin,
            self.status.clone(),
            self.capture.digital_interval(),
        );

        self.workers.push(
            std::thread::Builder::new()
                .name("analog-acq".into())
                .spawn(move || analog_loop.run())?,
        );
        self.workers.push(
            std::thread::Builder::new()
                .name("digital-acq".into())
                .spawn(move || digital_loop.run())?,
        );

        tracing::info!("Session started (depth {})", request.sample_depth);
        Ok(())
    }

    /// Stop the session. Idempotent: stopping an already stopped session
    /// does nothing.
    pub fn stop(&mut self) {
        if self.run.state() == RunState::Stopped {
            return;
        }

        self.run.request_stop();

        let deadline = Instant::now() + STOP_GRACE;
        while Instant::now() < deadline && self.workers.iter().any(|w| !w.is_finished()) {
            std::thread::sleep(STOP_POLL);
        }

        for worker in self.workers.drain(..) {
            if worker.is_finished() {
                // The loop already ran its teardown; reap the thread.
                let _ = worker.join();
            } else {
                // Wedged in a blocking read. Detach; the transport timeout
                // bounds how long it can outlive the session.
                tracing::warn!(
                    "Worker {:?} did not stop within the grace period",
                    worker.thread().name().unwrap_or("?")
                );
            }
        }

        self.run.mark_stopped();
        tracing::info!("Session stopped");
    }

    /// True while the session accepts samples
    pub fn is_running(&self) -> bool {
        self.run.is_running()
    }

    /// Current lifecycle state
    pub fn state(&self) -> RunState {
        self.run.state()
    }

    /// The analog series handle for the render consumer
    pub fn analog_series(&self) -> AnalogSeries {
        self.analog.clone()
    }

    /// The digital series handle for the render consumer
    pub fn digital_series(&self) -> DigitalSeries {
        self.digital.clone()
    }

    /// The channel-1 gauge cell
    pub fn level_cell(&self) -> LevelCell {
        self.level.clone()
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        // A loop must never outlive its hardware handle holder.
        self.stop();
    }
}
