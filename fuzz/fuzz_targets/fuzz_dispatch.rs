//! Fuzz target: inbound message path
//!
//! Splits the input at the first NUL into topic and payload, pushes it
//! through the inbox and dispatcher into a live engine, and checks that
//! the engine stays in a consistent state whatever arrives.
//!
//! cargo fuzz run fuzz_dispatch

#![no_main]

use libfuzzer_sys::fuzz_target;
use thermowatch::app::events::AppEvent;
use thermowatch::app::ports::{ActuatorPort, EventSink};
use thermowatch::app::service::ControlEngine;
use thermowatch::config::SystemConfig;
use thermowatch::control::{ActuatorState, ControlMode};
use thermowatch::messaging::dispatch::{decode, Dispatcher};
use thermowatch::messaging::Inbox;

struct Null;

impl ActuatorPort for Null {
    fn set_cooling(&mut self, _: ActuatorState) {}
    fn set_alarm(&mut self, _: bool) {}
}

impl EventSink for Null {
    fn emit(&mut self, _: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let (topic, payload) = match data.iter().position(|b| *b == 0) {
        Some(i) => (&data[..i], &data[i + 1..]),
        None => (data, &[][..]),
    };
    let Ok(topic) = core::str::from_utf8(topic) else {
        return;
    };

    let direct = decode(topic, payload);

    let inbox = Inbox::new();
    let mut engine = ControlEngine::new(&SystemConfig::default());
    let mut dispatcher = Dispatcher::new();
    let queued = inbox.push(topic, payload).is_ok();
    inbox.drain(|msg| {
        dispatcher.route(&msg, &mut engine, &mut Null, &mut Null);
    });

    // Anything the dispatcher rejected must also fail a direct decode.
    if queued && dispatcher.rejected() == 1 {
        assert!(direct.is_err());
    }
    // Starting in auto mode, no single message can switch cooling on.
    if engine.mode() == ControlMode::Auto {
        assert_eq!(engine.actuator(), ActuatorState::Off);
    }
});
