//! System configuration parameters
//!
//! Every tunable in Thermowatch is a compile-time constant.  [`SystemConfig`]
//! bundles them into one value so the control engine can be constructed
//! explicitly (and differently) in tests, and so the active set can be
//! dumped as JSON at boot.

use serde::{Deserialize, Serialize};

// --- Thresholds ---

/// Temperature (°C) above which the alarm activates.
pub const HIGH_THRESHOLD_C: f32 = 37.0;
/// Dead band below [`HIGH_THRESHOLD_C`] before the alarm clears.
pub const HYSTERESIS_MARGIN_C: f32 = 2.0;

// --- Timing ---

/// Main loop period (milliseconds).
pub const LOOP_INTERVAL_MS: u32 = 100;
/// Heartbeat telemetry period (milliseconds).
pub const TELEMETRY_INTERVAL_MS: u32 = 500;
/// Button debounce settle time (milliseconds).
pub const DEBOUNCE_MS: u32 = 50;
/// Poll period while waiting for a held button to be released.
pub const RELEASE_POLL_MS: u32 = 10;
/// Length of the buzzer chirp on alarm activation (milliseconds).
pub const ALARM_CHIRP_MS: u32 = 500;
/// Minimum interval between two physical DHT22 reads (milliseconds).
pub const SENSOR_MIN_INTERVAL_MS: u32 = 2000;
/// Diagnostics report period (milliseconds).
pub const DIAGNOSTICS_INTERVAL_MS: u32 = 60_000;

// --- Actuators ---

/// Servo angle (degrees) when cooling is engaged.
pub const SERVO_COOLING_ANGLE: u8 = 180;
/// Servo angle (degrees) at rest.
pub const SERVO_REST_ANGLE: u8 = 0;
/// Alarm buzzer tone (Hz).
pub const BUZZER_FREQ_HZ: u32 = 1000;

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Alarm activates strictly above this temperature (°C)
    pub high_threshold_c: f32,
    /// Alarm clears at or below `high_threshold_c - hysteresis_margin_c`
    pub hysteresis_margin_c: f32,

    /// Main loop interval (milliseconds)
    pub loop_interval_ms: u32,
    /// Telemetry heartbeat interval (milliseconds)
    pub telemetry_interval_ms: u32,
    /// Diagnostics report interval (milliseconds)
    pub diagnostics_interval_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            high_threshold_c: HIGH_THRESHOLD_C,
            hysteresis_margin_c: HYSTERESIS_MARGIN_C,

            loop_interval_ms: LOOP_INTERVAL_MS,
            telemetry_interval_ms: TELEMETRY_INTERVAL_MS,
            diagnostics_interval_ms: DIAGNOSTICS_INTERVAL_MS,
        }
    }
}

impl SystemConfig {
    /// Reject configurations that would make the control loop chatter or stall.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.high_threshold_c.is_finite() {
            return Err("high_threshold_c must be finite");
        }
        if !(self.hysteresis_margin_c.is_finite() && self.hysteresis_margin_c > 0.0) {
            return Err("hysteresis_margin_c must be positive");
        }
        if self.loop_interval_ms == 0 || self.telemetry_interval_ms == 0 {
            return Err("intervals must be non-zero");
        }
        if self.telemetry_interval_ms < self.loop_interval_ms {
            return Err("telemetry cannot run faster than the loop");
        }
        Ok(())
    }
}
