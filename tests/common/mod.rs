//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use daqview_rs::error::{DaqError, Result};
use daqview_rs::hardware::{AnalogInput, Chassis, DigitalInput, DigitalOutput};
use daqview_rs::types::{DeviceInfo, ANALOG_CHANNELS};

/// Deadline for the acquisition loops to produce enough samples
pub const SETTLE: Duration = Duration::from_millis(80);

/// A deterministic chassis whose reads replay scripted data.
///
/// Analog reads cycle through `analog_frames` (repeating the last frame
/// once exhausted); digital reads walk `digital_bytes` the same way.
/// Configure calls can be scripted to reject a named identifier, and every
/// teardown bumps a shared counter so tests can assert close-on-every-path.
#[derive(Clone, Default)]
pub struct ScriptedChassis {
    pub analog_frames: Vec<[f64; ANALOG_CHANNELS]>,
    pub digital_bytes: Vec<u8>,
    /// Identifier substring that fails to configure (any group)
    pub unavailable: Option<String>,
    pub written_patterns: Arc<Mutex<Vec<u8>>>,
    pub analog_closes: Arc<AtomicUsize>,
    pub digital_closes: Arc<AtomicUsize>,
    pub output_closes: Arc<AtomicUsize>,
}

impl ScriptedChassis {
    pub fn new() -> Self {
        Self {
            analog_frames: vec![[1.0, 2.0, 3.0, 4.0]],
            digital_bytes: vec![0b0001],
            ..Self::default()
        }
    }

    pub fn with_analog_frames(mut self, frames: Vec<[f64; ANALOG_CHANNELS]>) -> Self {
        self.analog_frames = frames;
        self
    }

    pub fn with_digital_bytes(mut self, bytes: Vec<u8>) -> Self {
        self.digital_bytes = bytes;
        self
    }

    pub fn with_unavailable(mut self, identifier: impl Into<String>) -> Self {
        self.unavailable = Some(identifier.into());
        self
    }

    fn reject_if_unavailable(&self, identifier: &str) -> Result<()> {
        match &self.unavailable {
            Some(marker) if identifier.contains(marker.as_str()) => Err(
                DaqError::channel_unavailable(identifier, "scripted failure"),
            ),
            _ => Ok(()),
        }
    }
}

impl Chassis for ScriptedChassis {
    fn list_devices(&self) -> Vec<DeviceInfo> {
        vec![DeviceInfo {
            name: "scriptMod1".into(),
            product: "Scripted AI".into(),
            serial: None,
        }]
    }

    fn configure_analog(
        &self,
        channels: &[String; ANALOG_CHANNELS],
    ) -> Result<Box<dyn AnalogInput>> {
        for channel in channels {
            self.reject_if_unavailable(channel)?;
        }
        Ok(Box::new(ScriptedAnalogTask {
            frames: self.analog_frames.clone(),
            cursor: 0,
            closes: Arc::clone(&self.analog_closes),
        }))
    }

    fn configure_digital_input(&self, port: &str) -> Result<Box<dyn DigitalInput>> {
        self.reject_if_unavailable(port)?;
        Ok(Box::new(ScriptedDigitalInTask {
            bytes: self.digital_bytes.clone(),
            cursor: 0,
            closes: Arc::clone(&self.digital_closes),
        }))
    }

    fn configure_digital_output(&self, port: &str) -> Result<Box<dyn DigitalOutput>> {
        self.reject_if_unavailable(port)?;
        Ok(Box::new(ScriptedDigitalOutTask {
            written: Arc::clone(&self.written_patterns),
            closes: Arc::clone(&self.output_closes),
        }))
    }
}

struct ScriptedAnalogTask {
    frames: Vec<[f64; ANALOG_CHANNELS]>,
    cursor: usize,
    closes: Arc<AtomicUsize>,
}

impl AnalogInput for ScriptedAnalogTask {
    fn read(&mut self) -> Result<[f64; ANALOG_CHANNELS]> {
        if self.frames.is_empty() {
            return Err(DaqError::Protocol("script exhausted".into()));
        }
        let index = self.cursor.min(self.frames.len() - 1);
        self.cursor += 1;
        Ok(self.frames[index])
    }

    fn close(&mut self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

struct ScriptedDigitalInTask {
    bytes: Vec<u8>,
    cursor: usize,
    closes: Arc<AtomicUsize>,
}

impl DigitalInput for ScriptedDigitalInTask {
    fn read(&mut self) -> Result<u8> {
        if self.bytes.is_empty() {
            return Err(DaqError::Protocol("script exhausted".into()));
        }
        let index = self.cursor.min(self.bytes.len() - 1);
        self.cursor += 1;
        Ok(self.bytes[index])
    }

    fn close(&mut self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

struct ScriptedDigitalOutTask {
    written: Arc<Mutex<Vec<u8>>>,
    closes: Arc<AtomicUsize>,
}

impl DigitalOutput for ScriptedDigitalOutTask {
    fn write(&mut self, pattern: u8) -> Result<()> {
        self.written
            .lock()
            .expect("written patterns lock")
            .push(pattern);
        Ok(())
    }

    fn close(&mut self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Default analog channel identifiers for tests
pub fn analog_channels() -> [String; ANALOG_CHANNELS] {
    std::array::from_fn(|i| format!("scriptMod1/ai{i}"))
}

/// Fast capture pacing so tests settle quickly
pub fn fast_capture() -> daqview_rs::config::CaptureConfig {
    daqview_rs::config::CaptureConfig {
        sample_depth: 100,
        analog_interval_ms: 1,
        digital_interval_ms: 1,
        render_interval_ms: 1,
    }
}
