//! Unified error types for the Thermowatch firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! top-level loop's handling uniform.  All variants are `Copy` so they can
//! be logged and counted without allocation.  None of them are fatal: the
//! control engine keeps running whatever arrives.

use core::fmt;

use crate::messaging::Channel;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An inbound message could not be turned into a command.
    Command(CommandError),
    /// A network/messaging collaborator failed.
    Comms(CommsError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command(e) => write!(f, "command: {e}"),
            Self::Comms(e) => write!(f, "comms: {e}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

/// Transient acquisition failures.  The caller turns these into an invalid
/// [`Reading`](crate::control::Reading) and keeps the last good value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The sensor did not answer within the protocol timeout.
    Timeout,
    /// Frame checksum did not match.
    ChecksumMismatch,
    /// Decoded value is outside the sensor's physical range.
    OutOfRange,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "sensor timeout"),
            Self::ChecksumMismatch => write!(f, "checksum mismatch"),
            Self::OutOfRange => write!(f, "reading out of range"),
        }
    }
}

impl core::error::Error for SensorError {}

// ---------------------------------------------------------------------------
// Command errors
// ---------------------------------------------------------------------------

/// Reasons an inbound message is dropped before reaching the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// Topic is not one of the inbound command channels.
    UnknownChannel,
    /// Channel is known but the payload is not in its vocabulary.
    UnrecognizedPayload(Channel),
    /// Payload bytes are not UTF-8.
    InvalidUtf8,
    /// Topic or payload exceeds the inbox buffer size.
    PayloadTooLong,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownChannel => write!(f, "unknown channel"),
            Self::UnrecognizedPayload(ch) => write!(f, "unrecognized payload on {}", ch.topic()),
            Self::InvalidUtf8 => write!(f, "payload is not UTF-8"),
            Self::PayloadTooLong => write!(f, "message too long"),
        }
    }
}

impl core::error::Error for CommandError {}

impl From<CommandError> for Error {
    fn from(e: CommandError) -> Self {
        Self::Command(e)
    }
}

// ---------------------------------------------------------------------------
// Communications errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsError {
    MqttConnectFailed,
    MqttPublishFailed,
    MqttSubscribeFailed,
    /// Inbound queue is full; the message was dropped.
    InboxFull,
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MqttConnectFailed => write!(f, "MQTT connect failed"),
            Self::MqttPublishFailed => write!(f, "MQTT publish failed"),
            Self::MqttSubscribeFailed => write!(f, "MQTT subscribe failed"),
            Self::InboxFull => write!(f, "inbound queue full"),
        }
    }
}

impl core::error::Error for CommsError {}

impl From<CommsError> for Error {
    fn from(e: CommsError) -> Self {
        Self::Comms(e)
    }
}
