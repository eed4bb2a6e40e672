//! Two-threshold alarm band.
//!
//! ```text
//!            Active ──────────────────────────────┐
//!              ▲                                  │ temp <= high - margin
//!  temp > high │        dead band: no change      ▼
//!            Inactive ◀───────────────────────────┘
//!   ──────────┼──────────────────────┼──────────▶ °C
//!        high - margin              high
//! ```
//!
//! Readings strictly inside `(high - margin, high]` never cause a
//! transition, whatever the current state.

use super::state::AlarmState;

/// Hysteresis evaluator for the over-temperature alarm.
#[derive(Debug, Clone, Copy)]
pub struct HysteresisBand {
    high: f32,
    margin: f32,
}

impl HysteresisBand {
    /// `margin` must be positive; a zero band would chatter on every sample.
    pub fn new(high: f32, margin: f32) -> Self {
        debug_assert!(margin > 0.0, "hysteresis margin must be positive");
        Self { high, margin }
    }

    /// Activation threshold (exclusive).
    pub fn high(&self) -> f32 {
        self.high
    }

    /// Clear threshold (inclusive).
    pub fn low(&self) -> f32 {
        self.high - self.margin
    }

    /// Return the new alarm state if `temperature_c` causes a transition
    /// out of `current`, or `None` to stay.
    pub fn evaluate(&self, current: AlarmState, temperature_c: f32) -> Option<AlarmState> {
        match current {
            AlarmState::Inactive if temperature_c > self.high => Some(AlarmState::Active),
            AlarmState::Active if temperature_c <= self.low() => Some(AlarmState::Inactive),
            _ => None,
        }
    }
}
