//! Core data types for DAQView-RS
//!
//! This module contains the fundamental data structures shared between the
//! session controller, the acquisition loops and the UI.
//!
//! # Main Types
//!
//! - [`RunState`] / [`RunFlag`] - Tri-state run lifecycle flag shared across threads
//! - [`DeviceInfo`] - A chassis module row for the device table
//! - [`LevelCell`] - Lock-free cell publishing the latest channel-1 voltage
//!
//! # Run lifecycle
//!
//! The run flag is the only cancellation signal in the system. Acquisition
//! loops poll it once per iteration, so cancellation latency is bounded by
//! one blocking read plus one poll interval, not instantaneous.

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;

/// Number of analog input channels sampled per tuple
pub const ANALOG_CHANNELS: usize = 4;

/// Number of independently toggled digital output lines
pub const DIGITAL_OUTPUT_LINES: usize = 4;

/// Number of bit positions decoded from the digital input port byte
pub const DIGITAL_PLOT_BITS: usize = 4;

/// Lifecycle state of a sampling session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum RunState {
    /// No session active; acquisition loops are not running
    #[default]
    Stopped = 0,
    /// Acquisition loops are sampling
    Running = 1,
    /// Stop requested; loops exit after their current iteration
    StoppingRequested = 2,
}

impl RunState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => RunState::Running,
            2 => RunState::StoppingRequested,
            _ => RunState::Stopped,
        }
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunState::Stopped => write!(f, "Stopped"),
            RunState::Running => write!(f, "Running"),
            RunState::StoppingRequested => write!(f, "Stopping"),
        }
    }
}

/// Shared, cloneable handle to the process-wide run state
#[derive(Debug, Clone, Default)]
pub struct RunFlag(Arc<AtomicU8>);

impl RunFlag {
    /// Create a new flag in the [`RunState::Stopped`] state
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> RunState {
        RunState::from_u8(self.0.load(Ordering::SeqCst))
    }

    /// True while acquisition loops should keep sampling
    pub fn is_running(&self) -> bool {
        self.state() == RunState::Running
    }

    /// Transition to Running (called by the session controller at start)
    pub fn set_running(&self) {
        self.0.store(RunState::Running as u8, Ordering::SeqCst);
    }

    /// Signal the loops to exit; no-op unless currently Running
    pub fn request_stop(&self) {
        let _ = self.0.compare_exchange(
            RunState::Running as u8,
            RunState::StoppingRequested as u8,
            Ordering::SeqCst,
            Ordering::SeqCst,
        );
    }

    /// Declare the session stopped (after the shutdown grace period)
    pub fn mark_stopped(&self) {
        self.0.store(RunState::Stopped as u8, Ordering::SeqCst);
    }
}

/// One chassis module row for the device table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Device name used in channel identifiers (e.g. "cDAQ1Mod1")
    pub name: String,
    /// Product type string
    pub product: String,
    /// Serial number, if the transport reports one
    pub serial: Option<String>,
}

impl std::fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.serial {
            Some(serial) => write!(f, "{} ({}, #{})", self.name, self.product, serial),
            None => write!(f, "{} ({})", self.name, self.product),
        }
    }
}

/// Lock-free cell for the instantaneous-value gauge.
///
/// The analog loop stores channel 1's latest voltage each iteration; the UI
/// loads it on every frame. Stored as f64 bits in an `AtomicU64` so neither
/// side ever takes a lock.
#[derive(Debug, Clone, Default)]
pub struct LevelCell(Arc<AtomicU64>);

impl LevelCell {
    /// Create a cell holding 0.0
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a new level
    pub fn store(&self, value: f64) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }

    /// Read the most recently published level
    pub fn load(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Relaxed))
    }
}
