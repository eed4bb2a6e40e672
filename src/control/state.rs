//! Control state vocabulary shared by the engine, ports, and adapters.
//!
//! Everything here is `Copy` and free of messaging or hardware detail.
//! The engine owns the only mutable instance of each value.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// One temperature/humidity sample.
///
/// `valid` is `false` when the sensor produced an unusable value.  An
/// invalid reading is never stored as the engine's last known good value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Ambient temperature (°C).
    pub temperature_c: f32,
    /// Relative humidity (%).
    pub humidity_pct: f32,
    /// False when either value could not be read.
    pub valid: bool,
}

impl Reading {
    /// Build a reading from raw values; NaN or infinite input yields an
    /// invalid reading.
    pub fn new(temperature_c: f32, humidity_pct: f32) -> Self {
        Self {
            temperature_c,
            humidity_pct,
            valid: temperature_c.is_finite() && humidity_pct.is_finite(),
        }
    }

    /// A reading that carries no data.
    pub const fn invalid() -> Self {
        Self {
            temperature_c: f32::NAN,
            humidity_pct: f32::NAN,
            valid: false,
        }
    }
}

// ---------------------------------------------------------------------------
// State enums
// ---------------------------------------------------------------------------

/// Over-temperature alarm.  Alarm outputs (LED + buzzer) mirror this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AlarmState {
    #[default]
    Inactive,
    Active,
}

impl AlarmState {
    pub fn is_active(self) -> bool {
        self == Self::Active
    }
}

/// Cooling actuator position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ActuatorState {
    #[default]
    Off,
    On,
}

impl ActuatorState {
    pub fn is_on(self) -> bool {
        self == Self::On
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Off => Self::On,
            Self::On => Self::Off,
        }
    }
}

/// Who is allowed to move the cooling actuator.
///
/// In `Auto` only the threshold policy (and the local override button)
/// changes it; in `Manual` only explicit commands and the button do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ControlMode {
    #[default]
    Auto,
    Manual,
}

impl ControlMode {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Auto => Self::Manual,
            Self::Manual => Self::Auto,
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Read-only view of the engine, used by telemetry and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Snapshot {
    /// Last known good reading (or [`Reading::invalid`] before the first one).
    pub reading: Reading,
    pub alarm: AlarmState,
    pub actuator: ActuatorState,
    pub mode: ControlMode,
}
