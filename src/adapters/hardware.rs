//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the DHT22, the damper servo and the alarm outputs, exposing them
//! through [`SensorPort`] and [`ActuatorPort`].  On non-espidf targets the
//! sensor uses its simulation stub and the actuators take mock pins.

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;
use log::info;

use crate::adapters::time::MonotonicClock;
use crate::app::ports::{ActuatorPort, SensorPort};
use crate::control::{ActuatorState, Reading};
use crate::drivers::alarm::AlarmDriver;
use crate::drivers::servo::ServoDriver;
use crate::sensors::Dht22;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<S, L, B> {
    sensor: Dht22,
    servo: ServoDriver<S>,
    alarm: AlarmDriver<L, B>,
    clock: MonotonicClock,
}

impl<S: SetDutyCycle, L: OutputPin, B: SetDutyCycle> HardwareAdapter<S, L, B> {
    pub fn new(sensor: Dht22, servo: ServoDriver<S>, alarm: AlarmDriver<L, B>) -> Self {
        Self {
            sensor,
            servo,
            alarm,
            clock: MonotonicClock::new(),
        }
    }

    /// Time-driven housekeeping; call once per loop iteration.
    pub fn service(&mut self, now_ms: u64) {
        if self.alarm.tick(now_ms) {
            info!("Alarm: chirp finished");
        }
    }

    pub fn servo_angle(&self) -> Option<u8> {
        self.servo.angle()
    }

    pub fn alarm_active(&self) -> bool {
        self.alarm.is_active()
    }

    pub fn alarm_sounding(&self) -> bool {
        self.alarm.is_sounding()
    }

    pub fn sensor_failures(&self) -> u32 {
        self.sensor.failures()
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<S: SetDutyCycle, L: OutputPin, B: SetDutyCycle> SensorPort for HardwareAdapter<S, L, B> {
    fn read(&mut self) -> Option<Reading> {
        let now = self.clock.uptime_ms();
        self.sensor.read(now)
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<S: SetDutyCycle, L: OutputPin, B: SetDutyCycle> ActuatorPort for HardwareAdapter<S, L, B> {
    fn set_cooling(&mut self, state: ActuatorState) {
        self.servo.set_state(state);
    }

    fn set_alarm(&mut self, on: bool) {
        self.alarm.set(on);
    }
}
