//! Periodic telemetry publisher.
//!
//! Publishes the engine's last good reading on the temperature and
//! humidity channels at a fixed cadence.  Values are rendered with two
//! decimals and retained so late subscribers see the latest sample.
//!
//! Nothing is published until the first valid reading exists.

use core::fmt::Write;

use log::{debug, warn};

use crate::app::ports::MessengerPort;
use crate::app::service::ControlEngine;
use crate::messaging::Channel;

/// Room for any finite `f32` rendered with `{:.2}`: `-f32::MAX` is 39
/// integer digits plus sign and fraction.
type Payload = heapless::String<48>;

/// Fixed-cadence telemetry gate.
#[derive(Debug)]
pub struct TelemetryScheduler {
    period_ms: u64,
    last_ms: Option<u64>,
    failures: u32,
}

impl TelemetryScheduler {
    pub fn new(period_ms: u32) -> Self {
        Self {
            period_ms: period_ms as u64,
            last_ms: None,
            failures: 0,
        }
    }

    /// Publish if a period has elapsed since the last publication.
    ///
    /// Fires on the first call.  Returns `true` when the period gate opened,
    /// even if there was no valid reading to send.
    pub fn tick(
        &mut self,
        now_ms: u64,
        engine: &ControlEngine,
        messenger: &mut impl MessengerPort,
    ) -> bool {
        if let Some(last) = self.last_ms {
            if now_ms.saturating_sub(last) < self.period_ms {
                return false;
            }
        }
        self.last_ms = Some(now_ms);

        let reading = engine.snapshot().reading;
        if !reading.valid {
            debug!("Telemetry: no valid reading yet");
            return true;
        }

        self.send(messenger, Channel::Temperature, reading.temperature_c);
        self.send(messenger, Channel::Humidity, reading.humidity_pct);
        true
    }

    /// Publish attempts that failed since boot.
    pub fn failures(&self) -> u32 {
        self.failures
    }

    fn send(&mut self, messenger: &mut impl MessengerPort, channel: Channel, value: f32) {
        let mut text = Payload::new();
        if write!(text, "{:.2}", value).is_err() {
            warn!("Telemetry: value {} does not fit payload buffer", value);
            return;
        }
        if let Err(e) = messenger.publish(channel, &text, true) {
            self.failures = self.failures.wrapping_add(1);
            warn!("Telemetry: publish on '{}' failed: {}", channel.topic(), e);
        }
    }
}
