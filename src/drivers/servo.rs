//! Hobby servo driver for the cooling damper.
//!
//! Standard 50 Hz servo frame: a 500 µs pulse is 0°, 2500 µs is 180°,
//! linear in between.  The PWM channel is anything implementing
//! `embedded_hal::pwm::SetDutyCycle` (LEDC on target).
//!
//! This driver is a dumb actuator: it holds the last commanded angle and
//! never decides anything on its own.

use embedded_hal::pwm::SetDutyCycle;
use log::warn;

use crate::config::{SERVO_COOLING_ANGLE, SERVO_REST_ANGLE};
use crate::control::ActuatorState;

/// One PWM frame at 50 Hz.
pub const FRAME_US: u16 = 20_000;
/// Pulse width at 0°.
pub const MIN_PULSE_US: u16 = 500;
/// Pulse width at 180°.
pub const MAX_PULSE_US: u16 = 2_500;
pub const MAX_ANGLE: u8 = 180;

/// Pulse width for `angle` degrees; angles past 180 clamp.
pub fn pulse_us(angle: u8) -> u16 {
    let angle = u32::from(angle.min(MAX_ANGLE));
    let span = u32::from(MAX_PULSE_US - MIN_PULSE_US);
    MIN_PULSE_US + (angle * span / u32::from(MAX_ANGLE)) as u16
}

/// Servo angle for each actuator state.
pub const fn angle_for(state: ActuatorState) -> u8 {
    match state {
        ActuatorState::On => SERVO_COOLING_ANGLE,
        ActuatorState::Off => SERVO_REST_ANGLE,
    }
}

pub struct ServoDriver<P> {
    pwm: P,
    angle: Option<u8>,
}

impl<P: SetDutyCycle> ServoDriver<P> {
    /// The servo position is unknown until the first command.
    pub fn new(pwm: P) -> Self {
        Self { pwm, angle: None }
    }

    pub fn set_angle(&mut self, angle: u8) {
        let angle = angle.min(MAX_ANGLE);
        match self.pwm.set_duty_cycle_fraction(pulse_us(angle), FRAME_US) {
            Ok(()) => self.angle = Some(angle),
            Err(e) => warn!("Servo: duty update to {}° failed ({:?})", angle, e),
        }
    }

    pub fn set_state(&mut self, state: ActuatorState) {
        self.set_angle(angle_for(state));
    }

    /// Last angle successfully written.
    pub fn angle(&self) -> Option<u8> {
        self.angle
    }
}
