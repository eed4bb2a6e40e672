//! Integration tests for the HardwareAdapter behind the engine.
//!
//! Real driver code (servo, alarm, simulated DHT22) runs against mock
//! embedded-hal pins, so the whole sensor → engine → actuator path is
//! exercised on the host.

use crate::mock_hw::{MockLed, MockPwm, RecordingSink};

use thermowatch::adapters::hardware::HardwareAdapter;
use thermowatch::app::ports::{ActuatorPort, SensorPort};
use thermowatch::app::service::ControlEngine;
use thermowatch::config::{SystemConfig, ALARM_CHIRP_MS, SERVO_COOLING_ANGLE, SERVO_REST_ANGLE};
use thermowatch::control::{ActuatorState, AlarmState, Reading};
use thermowatch::drivers::alarm::AlarmDriver;
use thermowatch::drivers::servo::ServoDriver;
use thermowatch::sensors::{dht22, Dht22};

type Board = HardwareAdapter<MockPwm, MockLed, MockPwm>;

fn make_board() -> Board {
    HardwareAdapter::new(
        Dht22::new(14),
        ServoDriver::new(MockPwm::new(16383)),
        AlarmDriver::new(MockLed::default(), MockPwm::new(255)),
    )
}

#[test]
fn engine_start_parks_servo_and_silences_alarm() {
    let mut hw = make_board();
    let mut engine = ControlEngine::new(&SystemConfig::default());
    engine.start(&mut hw, &mut RecordingSink::default());

    assert_eq!(hw.servo_angle(), Some(SERVO_REST_ANGLE));
    assert!(!hw.alarm_active());
    assert!(!hw.alarm_sounding());
}

#[test]
fn alarm_drives_servo_and_chirps_once() {
    let mut hw = make_board();
    let mut sink = RecordingSink::default();
    let mut engine = ControlEngine::new(&SystemConfig::default());
    engine.start(&mut hw, &mut sink);

    engine.on_reading(Reading::new(39.0, 50.0), &mut hw, &mut sink);
    assert_eq!(engine.alarm(), AlarmState::Active);
    assert_eq!(hw.servo_angle(), Some(SERVO_COOLING_ANGLE));
    assert!(hw.alarm_active());
    assert!(hw.alarm_sounding());

    // The chirp starts on the first service tick and stops after its length.
    hw.service(1_000);
    assert!(hw.alarm_sounding());
    hw.service(1_000 + u64::from(ALARM_CHIRP_MS));
    assert!(!hw.alarm_sounding());
    assert!(hw.alarm_active(), "LED stays on for as long as the alarm");

    // Re-asserting an active alarm does not restart the chirp.
    hw.set_alarm(true);
    assert!(!hw.alarm_sounding());

    engine.on_reading(Reading::new(30.0, 50.0), &mut hw, &mut sink);
    assert_eq!(hw.servo_angle(), Some(SERVO_REST_ANGLE));
    assert!(!hw.alarm_active());
}

#[test]
fn manual_cooling_moves_servo_directly() {
    let mut hw = make_board();
    hw.set_cooling(ActuatorState::On);
    assert_eq!(hw.servo_angle(), Some(SERVO_COOLING_ANGLE));
    hw.set_cooling(ActuatorState::Off);
    assert_eq!(hw.servo_angle(), Some(SERVO_REST_ANGLE));
}

// Both halves drive the shared simulated sensor, so they run as one test.
#[test]
fn simulated_sensor_feeds_engine_once_per_conversion() {
    let mut sink = RecordingSink::default();

    // A dead sensor polled every loop inside one conversion interval is
    // one failure, for the driver and the engine alike.
    dht22::sim_set_frame(None);
    let mut hw = make_board();
    let mut engine = ControlEngine::new(&SystemConfig::default());
    for _ in 0..10 {
        if let Some(reading) = hw.read() {
            engine.on_reading(reading, &mut hw, &mut sink);
        }
    }
    assert_eq!(hw.sensor_failures(), 1);
    assert_eq!(engine.diagnostics().sensor_failures, hw.sensor_failures());

    // 24.0 °C, 45.0 %.
    dht22::sim_set_frame(Some([0x01, 0xC2, 0x00, 0xF0, 0xB3]));
    let mut hw = make_board();
    let mut engine = ControlEngine::new(&SystemConfig::default());

    let reading = hw.read().expect("first poll samples the sensor");
    assert!(reading.valid);
    assert_eq!(reading.temperature_c, 24.0);
    assert_eq!(reading.humidity_pct, 45.0);
    assert_eq!(hw.read(), None, "no second sample inside the interval");

    engine.on_reading(reading, &mut hw, &mut sink);
    assert_eq!(engine.snapshot().reading, reading);
    assert_eq!(engine.alarm(), AlarmState::Inactive);
    assert_eq!(engine.diagnostics().readings_accepted, 1);
    assert_eq!(hw.sensor_failures(), 0);
}
