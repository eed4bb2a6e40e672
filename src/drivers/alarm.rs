//! Audible + visual over-temperature alarm.
//!
//! The LED stays lit for as long as the alarm is active.  The buzzer only
//! chirps: it starts when the alarm is raised and is silenced by
//! [`AlarmDriver::tick`] once `ALARM_CHIRP_MS` has elapsed.
//!
//! `set()` carries no timestamp; the chirp window opens at the first
//! `tick()` after activation, so it is accurate to one loop interval.

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;
use log::warn;

use crate::config::ALARM_CHIRP_MS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Chirp {
    Silent,
    /// Buzzer on, window not yet anchored to a timestamp.
    Pending,
    Sounding { since_ms: u64 },
}

pub struct AlarmDriver<L, B> {
    led: L,
    buzzer: B,
    active: bool,
    chirp: Chirp,
}

impl<L: OutputPin, B: SetDutyCycle> AlarmDriver<L, B> {
    pub fn new(led: L, buzzer: B) -> Self {
        Self {
            led,
            buzzer,
            active: false,
            chirp: Chirp::Silent,
        }
    }

    /// Raise or clear the alarm.  Re-raising an active alarm does not
    /// restart the chirp.
    pub fn set(&mut self, on: bool) {
        if on == self.active {
            return;
        }
        self.active = on;

        let led = if on {
            self.led.set_high()
        } else {
            self.led.set_low()
        };
        if let Err(e) = led {
            warn!("Alarm: LED write failed ({:?})", e);
        }

        if on {
            self.buzzer_on();
            self.chirp = Chirp::Pending;
        } else {
            self.buzzer_off();
            self.chirp = Chirp::Silent;
        }
    }

    /// Advance the chirp timer.  Returns `true` when this call silenced the
    /// buzzer.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        match self.chirp {
            Chirp::Silent => false,
            Chirp::Pending => {
                self.chirp = Chirp::Sounding { since_ms: now_ms };
                false
            }
            Chirp::Sounding { since_ms } => {
                if now_ms.saturating_sub(since_ms) >= u64::from(ALARM_CHIRP_MS) {
                    self.buzzer_off();
                    self.chirp = Chirp::Silent;
                    true
                } else {
                    false
                }
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_sounding(&self) -> bool {
        self.chirp != Chirp::Silent
    }

    /// 50 % duty square wave; the tone comes from the timer frequency.
    fn buzzer_on(&mut self) {
        if let Err(e) = self.buzzer.set_duty_cycle_percent(50) {
            warn!("Alarm: buzzer on failed ({:?})", e);
        }
    }

    fn buzzer_off(&mut self) {
        if let Err(e) = self.buzzer.set_duty_cycle_fully_off() {
            warn!("Alarm: buzzer off failed ({:?})", e);
        }
    }
}
