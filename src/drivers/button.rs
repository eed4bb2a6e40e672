//! Debounced push-button driver.
//!
//! ## Hardware
//!
//! Active-low momentary switch with pull-up: the pin reads LOW while held.
//!
//! ## Edge detection
//!
//! [`DebouncedButton::poll_press`] reports one press per physical actuation:
//!
//! 1. Pin LOW? Otherwise return immediately.
//! 2. Wait `DEBOUNCE_MS` and re-sample; a HIGH here was contact bounce.
//! 3. Block, polling every `RELEASE_POLL_MS`, until the pin goes HIGH.
//!
//! Step 3 is what guarantees a held button never toggles twice.  It blocks
//! the main loop for as long as the button is held.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;
use log::{debug, warn};

use crate::app::commands::Button;
use crate::app::ports::InputPort;
use crate::config::{DEBOUNCE_MS, RELEASE_POLL_MS};

pub struct DebouncedButton<P> {
    pin: P,
    name: &'static str,
}

impl<P: InputPin> DebouncedButton<P> {
    pub fn new(pin: P, name: &'static str) -> Self {
        Self { pin, name }
    }

    /// `true` exactly once per press; returns after the release.
    pub fn poll_press(&mut self, delay: &mut impl DelayNs) -> bool {
        if !self.is_held() {
            return false;
        }

        delay.delay_ms(DEBOUNCE_MS);
        if !self.is_held() {
            debug!("Button '{}': bounce rejected", self.name);
            return false;
        }

        while self.is_held() {
            delay.delay_ms(RELEASE_POLL_MS);
        }
        debug!("Button '{}': press", self.name);
        true
    }

    /// A pin read error counts as released so the loop can never wedge on it.
    fn is_held(&mut self) -> bool {
        match self.pin.is_low() {
            Ok(low) => low,
            Err(e) => {
                warn!("Button '{}': read failed ({:?})", self.name, e);
                false
            }
        }
    }
}

/// The two-button front panel, exposed as an [`InputPort`].
pub struct ButtonPanel<C, M, D> {
    cooling: DebouncedButton<C>,
    mode: DebouncedButton<M>,
    delay: D,
}

impl<C: InputPin, M: InputPin, D: DelayNs> ButtonPanel<C, M, D> {
    pub fn new(cooling: C, mode: M, delay: D) -> Self {
        Self {
            cooling: DebouncedButton::new(cooling, "cooling"),
            mode: DebouncedButton::new(mode, "mode"),
            delay,
        }
    }
}

impl<C: InputPin, M: InputPin, D: DelayNs> InputPort for ButtonPanel<C, M, D> {
    fn poll_edge(&mut self, button: Button) -> bool {
        match button {
            Button::Cooling => self.cooling.poll_press(&mut self.delay),
            Button::Mode => self.mode.poll_press(&mut self.delay),
        }
    }
}
