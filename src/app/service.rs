//! Control engine: the hexagonal core.
//!
//! [`ControlEngine`] owns the alarm, actuator and mode state plus the last
//! good reading.  All mutation funnels through three entry points
//! (`on_reading`, `on_button`, `on_command`); ports are injected at call
//! sites, making the whole engine testable with mock adapters.
//!
//! ```text
//!   SensorPort ──▶ on_reading ─┐                  ┌──▶ ActuatorPort
//!    InputPort ──▶ on_button  ─┼─▶ ControlEngine ─┤
//!   Dispatcher ──▶ on_command ─┘                  └──▶ EventSink
//! ```

use log::{debug, info, warn};

use crate::config::SystemConfig;
use crate::control::{ActuatorState, AlarmState, ControlMode, HysteresisBand, Reading, Snapshot};
use crate::diagnostics::DiagnosticCounters;

use super::commands::{Button, Command, CommandOutcome};
use super::events::AppEvent;
use super::ports::{ActuatorPort, EventSink};

// ───────────────────────────────────────────────────────────────
// ControlEngine
// ───────────────────────────────────────────────────────────────

/// Owns every piece of control state.  Nothing else holds a writable
/// reference to it.
pub struct ControlEngine {
    band: HysteresisBand,
    last_good: Reading,
    alarm: AlarmState,
    actuator: ActuatorState,
    mode: ControlMode,
    diag: DiagnosticCounters,
}

impl ControlEngine {
    /// Construct the engine in its power-on state: `Inactive / Off / Auto`.
    ///
    /// Does **not** touch the outputs; call [`start`](Self::start) next.
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            band: HysteresisBand::new(config.high_threshold_c, config.hysteresis_margin_c),
            last_good: Reading::invalid(),
            alarm: AlarmState::Inactive,
            actuator: ActuatorState::Off,
            mode: ControlMode::Auto,
            diag: DiagnosticCounters::default(),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive the outputs to match the power-on state and announce it.
    pub fn start(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        hw.set_cooling(self.actuator);
        hw.set_alarm(self.alarm.is_active());
        sink.emit(&AppEvent::Started(self.snapshot()));
        info!(
            "ControlEngine started (alarm above {:.1}°C, clears at {:.1}°C)",
            self.band.high(),
            self.band.low()
        );
    }

    // ── Sensor input ──────────────────────────────────────────

    /// Feed one sample through the hysteresis policy.
    ///
    /// An invalid reading changes nothing; it is logged and counted.
    /// Returns the new alarm state when a transition happened.
    pub fn on_reading(
        &mut self,
        reading: Reading,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) -> Option<AlarmState> {
        if !reading.valid {
            self.diag.record_sensor_failure();
            warn!("Sensor read failed; keeping last good reading");
            return None;
        }

        self.last_good = reading;
        self.diag.record_reading();

        let next = self.band.evaluate(self.alarm, reading.temperature_c)?;
        self.alarm = next;

        match next {
            AlarmState::Active => {
                warn!(
                    "ALERT: {:.1}°C above {:.1}°C threshold",
                    reading.temperature_c,
                    self.band.high()
                );
                hw.set_alarm(true);
                if self.mode == ControlMode::Auto && !self.actuator.is_on() {
                    self.drive_cooling(ActuatorState::On, hw, sink);
                }
            }
            AlarmState::Inactive => {
                info!("Temperature back to normal ({:.1}°C)", reading.temperature_c);
                hw.set_alarm(false);
                if self.mode == ControlMode::Auto && self.actuator.is_on() {
                    self.drive_cooling(ActuatorState::Off, hw, sink);
                }
            }
        }

        sink.emit(&AppEvent::AlarmChanged(next));
        Some(next)
    }

    // ── Local input ───────────────────────────────────────────

    /// Handle one debounced button press.
    pub fn on_button(
        &mut self,
        button: Button,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) {
        match button {
            Button::Cooling => {
                let next = self.actuator.toggled();
                info!("Button: cooling toggle -> {:?} ({:?} mode)", next, self.mode);
                self.drive_cooling(next, hw, sink);
            }
            Button::Mode => {
                let next = self.mode.toggled();
                info!("Button: mode toggle -> {:?}", next);
                self.set_mode(next, sink);
            }
        }
    }

    // ── Remote commands ───────────────────────────────────────

    /// Apply a decoded remote command under the auto/manual arbitration rule.
    pub fn on_command(
        &mut self,
        cmd: Command,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) -> CommandOutcome {
        match cmd {
            Command::SetActuator(target) => {
                if self.mode == ControlMode::Auto {
                    self.diag.record_ignored_command();
                    debug!("Ignoring remote {:?} while in Auto mode", target);
                    return CommandOutcome::IgnoredInAutoMode;
                }
                info!("Remote: cooling -> {:?}", target);
                self.drive_cooling(target, hw, sink);
            }
            Command::SetMode(mode) => {
                if mode != self.mode {
                    info!("Remote: mode -> {:?}", mode);
                    self.set_mode(mode, sink);
                }
            }
        }
        CommandOutcome::Applied
    }

    // ── Queries ───────────────────────────────────────────────

    /// Pure read of the current state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            reading: self.last_good,
            alarm: self.alarm,
            actuator: self.actuator,
            mode: self.mode,
        }
    }

    /// Hysteresis alarm as of the last valid reading.
    pub fn alarm(&self) -> AlarmState {
        self.alarm
    }

    /// Last cooling state commanded to the hardware.
    pub fn actuator(&self) -> ActuatorState {
        self.actuator
    }

    /// Who owns the actuator: the hysteresis policy or the operator.
    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    /// Counters since boot, copied out.
    pub fn diagnostics(&self) -> DiagnosticCounters {
        self.diag
    }

    // ── Internal ──────────────────────────────────────────────

    fn drive_cooling(
        &mut self,
        target: ActuatorState,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) {
        self.actuator = target;
        hw.set_cooling(target);
        sink.emit(&AppEvent::CoolingChanged(target));
    }

    fn set_mode(&mut self, mode: ControlMode, sink: &mut impl EventSink) {
        self.mode = mode;
        sink.emit(&AppEvent::ModeChanged(mode));
    }
}
