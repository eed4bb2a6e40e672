//! Inbound commands to the control engine.
//!
//! These represent actions requested by the outside world.  Remote
//! [`Command`]s are decoded from MQTT by
//! [`messaging::dispatch`](crate::messaging::dispatch); [`Button`] edges come
//! from the local input panel.  Neither carries a timestamp or origin:
//! the last one delivered wins.

use crate::control::{ActuatorState, ControlMode};

/// Remote commands the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Drive the cooling actuator.  Honoured only in manual mode.
    SetActuator(ActuatorState),

    /// Switch between automatic and manual control.  Always honoured.
    SetMode(ControlMode),
}

/// The two physical push-buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Button 1: toggle cooling, in any mode.
    Cooling,
    /// Button 2: toggle auto/manual.
    Mode,
}

impl Button {
    pub const ALL: [Self; 2] = [Self::Cooling, Self::Mode];
}

/// What the engine did with a [`Command`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// State was written (it may already have held the requested value).
    Applied,
    /// `SetActuator` arrived while in automatic mode; nothing changed.
    IgnoredInAutoMode,
}
