//! Runtime diagnostics.
//!
//! Non-fatal conditions (sensor failures, ignored or rejected commands)
//! never change control state; they are counted here and reported as a
//! JSON line on the serial log at a fixed cadence.

use serde::Serialize;

use crate::control::Snapshot;

/// Counters owned by the control engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiagnosticCounters {
    /// Valid readings fed to the hysteresis policy.
    pub readings_accepted: u32,
    /// Readings dropped because the sensor produced no usable value.
    pub sensor_failures: u32,
    /// `SetActuator` commands ignored because the mode was automatic.
    pub ignored_commands: u32,
}

impl DiagnosticCounters {
    pub fn record_reading(&mut self) {
        self.readings_accepted = self.readings_accepted.wrapping_add(1);
    }

    pub fn record_sensor_failure(&mut self) {
        self.sensor_failures = self.sensor_failures.wrapping_add(1);
    }

    pub fn record_ignored_command(&mut self) {
        self.ignored_commands = self.ignored_commands.wrapping_add(1);
    }
}

/// Periodic report assembled by the main loop.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticsReport {
    pub uptime_secs: u64,
    pub snapshot: Snapshot,
    pub counters: DiagnosticCounters,
    /// Inbound messages dropped by the dispatcher.
    pub rejected_messages: u32,
    /// Inbound messages dropped because the inbox was full.
    pub inbox_dropped: u32,
}

impl DiagnosticsReport {
    /// Serialise to a single JSON line.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Fixed-cadence gate for the report, driven by the loop's millisecond clock.
#[derive(Debug)]
pub struct ReportTimer {
    interval_ms: u64,
    last_ms: Option<u64>,
}

impl ReportTimer {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms: interval_ms as u64,
            last_ms: None,
        }
    }

    /// `true` when a report is due.  The first call only arms the timer.
    pub fn due(&mut self, now_ms: u64) -> bool {
        match self.last_ms {
            None => {
                self.last_ms = Some(now_ms);
                false
            }
            Some(last) if now_ms.saturating_sub(last) >= self.interval_ms => {
                self.last_ms = Some(now_ms);
                true
            }
            Some(_) => false,
        }
    }
}
