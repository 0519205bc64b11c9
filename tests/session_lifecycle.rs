//! Integration tests for the acquisition session lifecycle
//!
//! These tests drive the full pipeline against a scripted chassis:
//! - Start/stop transitions and idempotence
//! - Depth-bounded FIFO behavior observed end-to-end
//! - Fail-fast configuration and teardown discipline
//! - The digital output command cycle

mod common;

use common::{analog_channels, fast_capture, ScriptedChassis, SETTLE};
use daqview_rs::acquisition::{pattern_from_selections, status_channel, OutputCommander, StatusEvent};
use daqview_rs::error::DaqError;
use daqview_rs::session::{RunRequest, SessionController};
use daqview_rs::types::RunState;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;

fn request(depth: usize) -> RunRequest {
    RunRequest {
        analog_channels: analog_channels(),
        digital_input: "scriptMod6/port0/line0:7".to_string(),
        sample_depth: depth,
    }
}

#[test]
fn test_start_samples_and_stop() {
    let chassis = ScriptedChassis::new();
    let (status_tx, _status_rx) = status_channel();
    let mut session =
        SessionController::new(Arc::new(chassis.clone()), status_tx, fast_capture());

    session.start(&request(100)).unwrap();
    assert_eq!(session.state(), RunState::Running);

    thread::sleep(SETTLE);
    session.stop();
    assert_eq!(session.state(), RunState::Stopped);

    let analog = session.analog_series().snapshot();
    let digital = session.digital_series().snapshot();
    assert!(!analog.is_empty(), "analog loop should have sampled");
    assert!(!digital.is_empty(), "digital loop should have sampled");
    assert_eq!(analog.timestamps.len(), analog.values.len());

    // Both loops tore their handles down exactly once
    assert_eq!(chassis.analog_closes.load(Ordering::SeqCst), 1);
    assert_eq!(chassis.digital_closes.load(Ordering::SeqCst), 1);
}

#[test]
fn test_depth_bound_holds_end_to_end() {
    let frames: Vec<[f64; 4]> = (0..32).map(|i| [i as f64; 4]).collect();
    let chassis = ScriptedChassis::new().with_analog_frames(frames);
    let (status_tx, _status_rx) = status_channel();
    let mut session = SessionController::new(Arc::new(chassis), status_tx, fast_capture());

    session.start(&request(3)).unwrap();
    thread::sleep(SETTLE);
    session.stop();

    let snap = session.analog_series().snapshot();
    assert_eq!(snap.len(), 3, "series must hold exactly the eviction bound");
    // The retained rows are the most recent ones, in original order
    assert!(snap.values.windows(2).all(|w| w[0][0] <= w[1][0]));
    assert!(snap.timestamps.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_failed_analog_configuration_appends_nothing() {
    let chassis = ScriptedChassis::new().with_unavailable("scriptMod1/ai2");
    let (status_tx, status_rx) = status_channel();
    let mut session =
        SessionController::new(Arc::new(chassis.clone()), status_tx, fast_capture());

    session.start(&request(100)).unwrap();
    thread::sleep(SETTLE);

    // The analog loop aborted before sampling; digital is unaffected
    assert!(session.analog_series().is_empty());
    assert!(!session.digital_series().is_empty());

    // No handle was opened, so none was closed
    assert_eq!(chassis.analog_closes.load(Ordering::SeqCst), 0);

    // The failure names the rejected channel
    let named = status_rx.try_iter().any(|event| match event {
        StatusEvent::Note { message, is_error } => {
            is_error && message.contains("scriptMod1/ai2")
        }
        StatusEvent::Clear => false,
    });
    assert!(named, "status surface should name the failing channel");

    session.stop();
    assert_eq!(session.state(), RunState::Stopped);
}

#[test]
fn test_stop_is_idempotent() {
    let chassis = ScriptedChassis::new();
    let (status_tx, _status_rx) = status_channel();
    let mut session =
        SessionController::new(Arc::new(chassis.clone()), status_tx, fast_capture());

    session.start(&request(10)).unwrap();
    thread::sleep(SETTLE);
    session.stop();
    session.stop();
    session.stop();

    assert_eq!(session.state(), RunState::Stopped);
    // Teardown ran once per loop, not once per stop() call
    assert_eq!(chassis.analog_closes.load(Ordering::SeqCst), 1);
    assert_eq!(chassis.digital_closes.load(Ordering::SeqCst), 1);
}

#[test]
fn test_restart_clears_previous_run() {
    let chassis = ScriptedChassis::new();
    let (status_tx, _status_rx) = status_channel();
    let mut session =
        SessionController::new(Arc::new(chassis.clone()), status_tx, fast_capture());

    session.start(&request(100)).unwrap();
    thread::sleep(SETTLE);
    session.stop();
    let first_run_len = session.analog_series().len();
    assert!(first_run_len > 0);

    // The second run starts from a cleared series and a fresh origin
    session.start(&request(100)).unwrap();
    thread::sleep(SETTLE);
    session.stop();

    let snap = session.analog_series().snapshot();
    assert!(!snap.is_empty());
    assert!(snap.timestamps.windows(2).all(|w| w[0] <= w[1]));
    // Timestamps restart near zero rather than continuing the old origin
    assert!(
        *snap.timestamps.first().unwrap() < 1_000,
        "second run must use its own timestamp origin"
    );
}

#[test]
fn test_zero_depth_rejected_without_spawning() {
    let chassis = ScriptedChassis::new();
    let (status_tx, _status_rx) = status_channel();
    let mut session =
        SessionController::new(Arc::new(chassis.clone()), status_tx, fast_capture());

    let err = session.start(&request(0)).unwrap_err();
    assert!(matches!(err, DaqError::InvalidSampleDepth(0)));
    assert_eq!(session.state(), RunState::Stopped);

    thread::sleep(SETTLE);
    assert!(session.analog_series().is_empty());
    assert!(session.digital_series().is_empty());
}

#[test]
fn test_digital_output_cycle_writes_once() {
    let chassis = ScriptedChassis::new();
    let (status_tx, _status_rx) = status_channel();
    let commander = OutputCommander::new(Arc::new(chassis.clone()), status_tx);

    let selections = [true, false, true, false];
    assert_eq!(pattern_from_selections(&selections), 0b0101);

    commander.send("scriptMod7/port0/line0:3", &selections);

    let written = chassis.written_patterns.lock().unwrap();
    assert_eq!(*written, vec![0b0101], "exactly one write per trigger");
    assert_eq!(chassis.output_closes.load(Ordering::SeqCst), 1);
}

#[test]
fn test_digital_output_bad_port_writes_nothing() {
    let chassis = ScriptedChassis::new().with_unavailable("scriptMod9");
    let (status_tx, status_rx) = status_channel();
    let commander = OutputCommander::new(Arc::new(chassis.clone()), status_tx);

    commander.send("scriptMod9/port0/line0:3", &[true; 4]);

    assert!(chassis.written_patterns.lock().unwrap().is_empty());
    assert!(status_rx.try_iter().any(|event| matches!(
        event,
        StatusEvent::Note { is_error: true, .. }
    )));
}

#[test]
fn test_status_cleared_on_next_start() {
    let chassis = ScriptedChassis::new().with_unavailable("scriptMod1/ai0");
    let (status_tx, status_rx) = status_channel();
    let mut session = SessionController::new(Arc::new(chassis), status_tx, fast_capture());

    session.start(&request(10)).unwrap();
    thread::sleep(SETTLE);
    session.stop();

    // Drop the failure note from the first run
    while status_rx.try_recv().is_ok() {}

    // The next start leads with a Clear for the status surface
    session.start(&request(10)).unwrap();
    let first = status_rx
        .iter()
        .find(|event| matches!(event, StatusEvent::Clear | StatusEvent::Note { .. }));
    assert_eq!(first, Some(StatusEvent::Clear));
    session.stop();
}
