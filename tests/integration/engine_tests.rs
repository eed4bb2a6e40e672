//! Integration tests for the ControlEngine → actuators / events pipeline.
//!
//! Drive the engine through its three entry points with mock adapters and
//! check both the resulting state and what reached the outside world.

use crate::mock_hw::{ActuatorCall, MockHardware, RecordingSink};

use thermowatch::app::commands::{Button, Command, CommandOutcome};
use thermowatch::app::events::AppEvent;
use thermowatch::app::service::ControlEngine;
use thermowatch::config::SystemConfig;
use thermowatch::control::{ActuatorState, AlarmState, ControlMode, Reading};

fn make_engine() -> (ControlEngine, MockHardware, RecordingSink) {
    let mut engine = ControlEngine::new(&SystemConfig::default());
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::default();
    engine.start(&mut hw, &mut sink);
    hw.clear();
    sink.events.clear();
    (engine, hw, sink)
}

fn feed(engine: &mut ControlEngine, hw: &mut MockHardware, sink: &mut RecordingSink, t: f32) {
    engine.on_reading(Reading::new(t, 40.0), hw, sink);
}

// ── Start-up ──────────────────────────────────────────────────

#[test]
fn start_drives_outputs_to_power_on_state() {
    let mut engine = ControlEngine::new(&SystemConfig::default());
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::default();
    engine.start(&mut hw, &mut sink);

    assert_eq!(
        hw.calls,
        [ActuatorCall::Cooling(ActuatorState::Off), ActuatorCall::Alarm(false)]
    );
    assert!(matches!(sink.events.as_slice(), [AppEvent::Started(_)]));

    let s = engine.snapshot();
    assert_eq!(s.alarm, AlarmState::Inactive);
    assert_eq!(s.actuator, ActuatorState::Off);
    assert_eq!(s.mode, ControlMode::Auto);
    assert!(!s.reading.valid);
}

// ── End-to-end over-temperature cycle ─────────────────────────

#[test]
fn over_temperature_cycle_in_auto_mode() {
    let (mut engine, mut hw, mut sink) = make_engine();

    feed(&mut engine, &mut hw, &mut sink, 38.0);
    assert_eq!(engine.alarm(), AlarmState::Active);
    assert_eq!(engine.actuator(), ActuatorState::On);
    assert_eq!(hw.alarm(), Some(true));
    assert_eq!(hw.cooling(), Some(ActuatorState::On));
    assert!(sink.events.contains(&AppEvent::AlarmChanged(AlarmState::Active)));

    sink.events.clear();
    feed(&mut engine, &mut hw, &mut sink, 34.0);
    assert_eq!(engine.alarm(), AlarmState::Inactive);
    assert_eq!(engine.actuator(), ActuatorState::Off);
    assert_eq!(hw.alarm(), Some(false));
    assert_eq!(hw.cooling(), Some(ActuatorState::Off));
    assert_eq!(
        sink.events,
        [
            AppEvent::CoolingChanged(ActuatorState::Off),
            AppEvent::AlarmChanged(AlarmState::Inactive),
        ]
    );
}

#[test]
fn dead_band_readings_do_not_clear_alarm() {
    let (mut engine, mut hw, mut sink) = make_engine();
    let mut seen = Vec::new();
    for t in [38.0, 36.5, 36.5, 35.0] {
        feed(&mut engine, &mut hw, &mut sink, t);
        seen.push(engine.alarm());
    }
    assert_eq!(
        seen,
        [
            AlarmState::Active,
            AlarmState::Active,
            AlarmState::Active,
            AlarmState::Inactive,
        ]
    );
}

#[test]
fn exactly_at_threshold_does_not_trigger() {
    let (mut engine, mut hw, mut sink) = make_engine();
    feed(&mut engine, &mut hw, &mut sink, 37.0);
    assert_eq!(engine.alarm(), AlarmState::Inactive);
    assert!(hw.calls.is_empty());
    assert!(sink.events.is_empty());
}

#[test]
fn invalid_reading_changes_nothing_and_keeps_last_good() {
    let (mut engine, mut hw, mut sink) = make_engine();
    feed(&mut engine, &mut hw, &mut sink, 38.0);
    hw.clear();
    sink.events.clear();

    let before = engine.snapshot();
    assert_eq!(engine.on_reading(Reading::invalid(), &mut hw, &mut sink), None);

    assert_eq!(engine.snapshot(), before);
    assert_eq!(engine.snapshot().reading.temperature_c, 38.0);
    assert!(hw.calls.is_empty());
    assert!(sink.events.is_empty());
    assert_eq!(engine.diagnostics().sensor_failures, 1);
}

// ── Manual mode ───────────────────────────────────────────────

#[test]
fn manual_mode_alarm_does_not_touch_cooling() {
    let (mut engine, mut hw, mut sink) = make_engine();
    engine.on_button(Button::Mode, &mut hw, &mut sink);
    assert_eq!(engine.mode(), ControlMode::Manual);

    feed(&mut engine, &mut hw, &mut sink, 40.0);
    assert_eq!(engine.alarm(), AlarmState::Active);
    assert_eq!(engine.actuator(), ActuatorState::Off);
    assert_eq!(hw.cooling(), None, "policy must not drive cooling in manual mode");
    assert_eq!(hw.alarm(), Some(true), "alarm output follows the alarm in any mode");
}

#[test]
fn remote_actuator_command_ignored_in_auto() {
    let (mut engine, mut hw, mut sink) = make_engine();
    let outcome = engine.on_command(Command::SetActuator(ActuatorState::On), &mut hw, &mut sink);

    assert_eq!(outcome, CommandOutcome::IgnoredInAutoMode);
    assert_eq!(engine.actuator(), ActuatorState::Off);
    assert!(hw.calls.is_empty());
    assert!(sink.events.is_empty());
    assert_eq!(engine.diagnostics().ignored_commands, 1);
}

#[test]
fn remote_actuator_command_applied_in_manual() {
    let (mut engine, mut hw, mut sink) = make_engine();
    engine.on_command(Command::SetMode(ControlMode::Manual), &mut hw, &mut sink);
    let outcome = engine.on_command(Command::SetActuator(ActuatorState::On), &mut hw, &mut sink);

    assert_eq!(outcome, CommandOutcome::Applied);
    assert_eq!(engine.actuator(), ActuatorState::On);
    assert_eq!(hw.cooling(), Some(ActuatorState::On));
    assert_eq!(
        sink.events.last(),
        Some(&AppEvent::CoolingChanged(ActuatorState::On))
    );
}

#[test]
fn repeated_mode_command_emits_once() {
    let (mut engine, mut hw, mut sink) = make_engine();
    engine.on_command(Command::SetMode(ControlMode::Manual), &mut hw, &mut sink);
    engine.on_command(Command::SetMode(ControlMode::Manual), &mut hw, &mut sink);
    assert_eq!(sink.events, [AppEvent::ModeChanged(ControlMode::Manual)]);
}

// ── Buttons ───────────────────────────────────────────────────

#[test]
fn cooling_button_overrides_in_auto_without_changing_mode() {
    let (mut engine, mut hw, mut sink) = make_engine();
    engine.on_button(Button::Cooling, &mut hw, &mut sink);

    assert_eq!(engine.actuator(), ActuatorState::On);
    assert_eq!(engine.mode(), ControlMode::Auto);
    assert_eq!(sink.events, [AppEvent::CoolingChanged(ActuatorState::On)]);
}

#[test]
fn mode_button_does_not_move_actuator() {
    let (mut engine, mut hw, mut sink) = make_engine();
    engine.on_button(Button::Mode, &mut hw, &mut sink);
    assert!(hw.calls.is_empty());
    assert_eq!(sink.events, [AppEvent::ModeChanged(ControlMode::Manual)]);
}

#[test]
fn buttons_are_involutions() {
    let (mut engine, mut hw, mut sink) = make_engine();
    let (actuator, mode) = (engine.actuator(), engine.mode());

    engine.on_button(Button::Cooling, &mut hw, &mut sink);
    engine.on_button(Button::Cooling, &mut hw, &mut sink);
    engine.on_button(Button::Mode, &mut hw, &mut sink);
    engine.on_button(Button::Mode, &mut hw, &mut sink);

    assert_eq!(engine.actuator(), actuator);
    assert_eq!(engine.mode(), mode);
}

#[test]
fn auto_policy_resyncs_after_button_override() {
    let (mut engine, mut hw, mut sink) = make_engine();
    // Operator forces cooling on while cool; the next clear transition is
    // the only thing that turns it back off.
    engine.on_button(Button::Cooling, &mut hw, &mut sink);
    feed(&mut engine, &mut hw, &mut sink, 38.0);
    assert_eq!(engine.actuator(), ActuatorState::On);
    feed(&mut engine, &mut hw, &mut sink, 30.0);
    assert_eq!(engine.actuator(), ActuatorState::Off);
}
