//! Inbound command routing.
//!
//! Decodes raw topic + payload pairs into [`Command`]s exactly once, at the
//! boundary, so the engine never sees MQTT vocabulary.  Anything that does
//! not decode is dropped here with a warning; it never reaches the engine,
//! not even as a no-op.

use log::{info, warn};

use crate::app::commands::{Command, CommandOutcome};
use crate::app::ports::{ActuatorPort, EventSink};
use crate::app::service::ControlEngine;
use crate::control::{ActuatorState, ControlMode};
use crate::error::CommandError;

use super::Channel;
use super::inbox::InboundMessage;

/// Decode one inbound message.
///
/// Surrounding ASCII whitespace is ignored; otherwise payloads must match
/// exactly (case-sensitive).
pub fn decode(topic: &str, payload: &[u8]) -> Result<Command, CommandError> {
    let channel = Channel::from_topic(topic)
        .filter(|c| c.is_inbound())
        .ok_or(CommandError::UnknownChannel)?;
    let text = core::str::from_utf8(payload)
        .map_err(|_| CommandError::InvalidUtf8)?
        .trim();

    match (channel, text) {
        (Channel::CoolingCommand, "ON") => Ok(Command::SetActuator(ActuatorState::On)),
        (Channel::CoolingCommand, "OFF") => Ok(Command::SetActuator(ActuatorState::Off)),
        (Channel::ModeCommand, "MANUAL") => Ok(Command::SetMode(ControlMode::Manual)),
        (Channel::ModeCommand, "AUTO") => Ok(Command::SetMode(ControlMode::Auto)),
        _ => Err(CommandError::UnrecognizedPayload(channel)),
    }
}

/// Routes drained inbox messages into the engine and counts rejects.
#[derive(Debug, Default)]
pub struct Dispatcher {
    rejected: u32,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `msg` and, if it is a command, apply it to `engine`.
    ///
    /// Returns the engine's outcome, or `None` when the message was dropped.
    pub fn route(
        &mut self,
        msg: &InboundMessage,
        engine: &mut ControlEngine,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) -> Option<CommandOutcome> {
        let shown = String::from_utf8_lossy(&msg.payload);
        info!("Message arrived on '{}': {}", msg.topic, shown);

        match decode(&msg.topic, &msg.payload) {
            Ok(cmd) => Some(engine.on_command(cmd, hw, sink)),
            Err(e) => {
                self.rejected = self.rejected.wrapping_add(1);
                warn!("Dropping message on '{}': {}", msg.topic, e);
                None
            }
        }
    }

    /// Messages dropped since boot.
    pub fn rejected(&self) -> u32 {
        self.rejected
    }
}
