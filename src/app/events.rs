//! Outbound application events.
//!
//! The [`ControlEngine`](super::service::ControlEngine) emits these through
//! the [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them; in production
//! [`MessengerSink`](crate::messaging::publisher::MessengerSink) turns them
//! into retained MQTT status messages.

use crate::control::{ActuatorState, AlarmState, ControlMode, Snapshot};

/// Edge-triggered notifications emitted by the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppEvent {
    /// The engine has driven its outputs to the power-on state.
    Started(Snapshot),

    /// The over-temperature alarm changed state.
    /// `Active` is the alert, `Inactive` the back-to-normal notice.
    AlarmChanged(AlarmState),

    /// The cooling actuator was driven (automatically or on request).
    CoolingChanged(ActuatorState),

    /// The control mode changed.
    ModeChanged(ControlMode),
}
