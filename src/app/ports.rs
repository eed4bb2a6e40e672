//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlEngine (domain)
//! ```
//!
//! Driven adapters (sensor, actuators, messenger, buttons, event sinks)
//! implement these traits.  The [`ControlEngine`](super::service::ControlEngine)
//! consumes them via generics, so the domain core never touches hardware
//! or the MQTT client directly.

use crate::control::{ActuatorState, Reading};
use crate::error::CommsError;
use crate::messaging::Channel;

use super::commands::Button;
use super::events::AppEvent;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the main loop calls this once per iteration.
pub trait SensorPort {
    /// Sample temperature and humidity.
    ///
    /// `None` means no new sample is available yet (the sensor is rate
    /// limited); the caller must not feed anything to the engine then.
    /// Never fails the caller: timeouts and corrupt frames come back as a
    /// reading with `valid == false`, once per failed conversion.
    fn read(&mut self) -> Option<Reading>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command actuators.
///
/// Both calls are idempotent and fire-and-forget.
pub trait ActuatorPort {
    /// Move the cooling actuator to its engaged or rest position.
    fn set_cooling(&mut self, state: ActuatorState);

    /// Switch the audible + visual alarm.
    fn set_alarm(&mut self, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Input port (driven adapter: buttons → domain)
// ───────────────────────────────────────────────────────────────

/// Debounced, edge-triggered button input.
pub trait InputPort {
    /// `true` at most once per physical press of `button`.
    fn poll_edge(&mut self, button: Button) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Messenger port (driven adapter: domain → pub/sub transport)
// ───────────────────────────────────────────────────────────────

/// Outbound half of the publish/subscribe transport.
///
/// Inbound messages do not come through this trait; the transport pushes
/// them into a [`messaging::Inbox`](crate::messaging::Inbox) that the main
/// loop drains.
pub trait MessengerPort {
    /// Publish `payload` on `channel`.  With `retained`, the broker keeps
    /// the value for late subscribers.
    fn publish(&mut self, channel: Channel, payload: &str, retained: bool)
    -> Result<(), CommsError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → status notifications)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`]s through this port.
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}
