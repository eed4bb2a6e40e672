//! Event-to-broker adapter.
//!
//! Implements [`EventSink`] by translating each [`AppEvent`] into a retained
//! status message on its channel.  Publish failures are logged and counted;
//! they never propagate back into the engine.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, MessengerPort};
use crate::control::{ActuatorState, AlarmState, ControlMode};

use super::Channel;

/// Alert payload for an alarm state.
pub const fn alert_payload(state: AlarmState) -> &'static str {
    match state {
        AlarmState::Active => "HIGH_TEMP_ALERT",
        AlarmState::Inactive => "TEMP_NORMAL",
    }
}

/// Cooling status payload.
pub const fn cooling_payload(state: ActuatorState) -> &'static str {
    match state {
        ActuatorState::On => "ACTIVE",
        ActuatorState::Off => "INACTIVE",
    }
}

/// Mode status payload.
pub const fn mode_payload(mode: ControlMode) -> &'static str {
    match mode {
        ControlMode::Auto => "AUTO",
        ControlMode::Manual => "MANUAL",
    }
}

/// [`EventSink`] that publishes status notifications through a
/// [`MessengerPort`].  Owns the messenger so telemetry can borrow it via
/// [`messenger_mut`](Self::messenger_mut).
pub struct MessengerSink<M> {
    messenger: M,
    publish_failures: u32,
}

impl<M: MessengerPort> MessengerSink<M> {
    pub fn new(messenger: M) -> Self {
        Self {
            messenger,
            publish_failures: 0,
        }
    }

    pub fn messenger(&self) -> &M {
        &self.messenger
    }

    pub fn messenger_mut(&mut self) -> &mut M {
        &mut self.messenger
    }

    /// Status publishes that failed since boot.
    pub fn publish_failures(&self) -> u32 {
        self.publish_failures
    }

    fn send(&mut self, channel: Channel, payload: &str) {
        if let Err(e) = self.messenger.publish(channel, payload, true) {
            self.publish_failures = self.publish_failures.wrapping_add(1);
            warn!("Status publish on '{}' failed: {}", channel.topic(), e);
        }
    }
}

impl<M: MessengerPort> EventSink for MessengerSink<M> {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(s) => {
                info!("START | mode={:?} cooling={:?}", s.mode, s.actuator);
                self.send(Channel::ModeStatus, mode_payload(s.mode));
                self.send(Channel::CoolingStatus, cooling_payload(s.actuator));
            }
            AppEvent::AlarmChanged(state) => {
                info!("ALERT | {:?}", state);
                self.send(Channel::Alert, alert_payload(*state));
            }
            AppEvent::CoolingChanged(state) => {
                info!("COOLING | {:?}", state);
                self.send(Channel::CoolingStatus, cooling_payload(*state));
            }
            AppEvent::ModeChanged(mode) => {
                info!("MODE | {:?}", mode);
                self.send(Channel::ModeStatus, mode_payload(*mode));
            }
        }
    }
}
