//! Mock adapters for integration tests.
//!
//! Record every actuator call, engine event and broker publish so tests can
//! assert on the full history without touching GPIO, LEDC or a broker.

use core::convert::Infallible;

use thermowatch::app::events::AppEvent;
use thermowatch::app::ports::{ActuatorPort, EventSink, MessengerPort};
use thermowatch::control::ActuatorState;
use thermowatch::error::CommsError;
use thermowatch::messaging::Channel;

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCall {
    Cooling(ActuatorState),
    Alarm(bool),
}

// ── MockHardware ──────────────────────────────────────────────

#[derive(Default)]
pub struct MockHardware {
    pub calls: Vec<ActuatorCall>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cooling(&self) -> Option<ActuatorState> {
        self.calls.iter().rev().find_map(|c| match c {
            ActuatorCall::Cooling(s) => Some(*s),
            ActuatorCall::Alarm(_) => None,
        })
    }

    pub fn alarm(&self) -> Option<bool> {
        self.calls.iter().rev().find_map(|c| match c {
            ActuatorCall::Alarm(on) => Some(*on),
            ActuatorCall::Cooling(_) => None,
        })
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl ActuatorPort for MockHardware {
    fn set_cooling(&mut self, state: ActuatorState) {
        self.calls.push(ActuatorCall::Cooling(state));
    }

    fn set_alarm(&mut self, on: bool) {
        self.calls.push(ActuatorCall::Alarm(on));
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(*event);
    }
}

// ── MockBroker ────────────────────────────────────────────────

/// Messenger that records publishes.  With `offline` set every publish
/// fails the way a disconnected client does.
#[derive(Default)]
pub struct MockBroker {
    pub published: Vec<(Channel, String, bool)>,
    pub offline: bool,
}

#[allow(dead_code)]
impl MockBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Payloads published on `channel`, oldest first.
    pub fn on(&self, channel: Channel) -> Vec<&str> {
        self.published
            .iter()
            .filter(|(c, _, _)| *c == channel)
            .map(|(_, p, _)| p.as_str())
            .collect()
    }

    pub fn clear(&mut self) {
        self.published.clear();
    }
}

impl MessengerPort for MockBroker {
    fn publish(&mut self, channel: Channel, payload: &str, retained: bool) -> Result<(), CommsError> {
        if self.offline {
            return Err(CommsError::MqttPublishFailed);
        }
        self.published.push((channel, payload.to_owned(), retained));
        Ok(())
    }
}

// ── Mock pins for the embedded-hal drivers ────────────────────

/// PWM channel that remembers its last duty.
#[allow(dead_code)]
pub struct MockPwm {
    pub duty: u16,
    pub max: u16,
}

#[allow(dead_code)]
impl MockPwm {
    pub fn new(max: u16) -> Self {
        Self { duty: 0, max }
    }
}

impl embedded_hal::pwm::ErrorType for MockPwm {
    type Error = Infallible;
}

impl embedded_hal::pwm::SetDutyCycle for MockPwm {
    fn max_duty_cycle(&self) -> u16 {
        self.max
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.duty = duty;
        Ok(())
    }
}

#[derive(Default)]
pub struct MockLed {
    pub high: bool,
}

impl embedded_hal::digital::ErrorType for MockLed {
    type Error = Infallible;
}

impl embedded_hal::digital::OutputPin for MockLed {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.high = true;
        Ok(())
    }
}
