//! Integration tests for the broker → inbox → dispatcher → engine → broker
//! round trip.
//!
//! Messages are pushed into an [`Inbox`] the way the MQTT receive thread
//! does, drained the way the main loop does, and the resulting status
//! publishes are checked on a mock broker.

use crate::mock_hw::{MockBroker, MockHardware};

use thermowatch::adapters::mqtt::accept_received;
use thermowatch::app::service::ControlEngine;
use thermowatch::config::SystemConfig;
use thermowatch::control::{ActuatorState, ControlMode, Reading};
use thermowatch::messaging::dispatch::Dispatcher;
use thermowatch::messaging::publisher::MessengerSink;
use thermowatch::messaging::{Channel, Inbox};
use thermowatch::telemetry::TelemetryScheduler;

struct Rig {
    engine: ControlEngine,
    hw: MockHardware,
    sink: MessengerSink<MockBroker>,
    dispatcher: Dispatcher,
    inbox: Inbox,
}

impl Rig {
    fn new() -> Self {
        let mut engine = ControlEngine::new(&SystemConfig::default());
        let mut hw = MockHardware::new();
        let mut sink = MessengerSink::new(MockBroker::new());
        engine.start(&mut hw, &mut sink);
        Self {
            engine,
            hw,
            sink,
            dispatcher: Dispatcher::new(),
            inbox: Inbox::new(),
        }
    }

    fn deliver(&mut self, channel: Channel, payload: &str) {
        assert!(accept_received(&self.inbox, Some(channel.topic()), payload.as_bytes(), true));
        self.pump();
    }

    fn pump(&mut self) {
        let Self {
            engine,
            hw,
            sink,
            dispatcher,
            inbox,
        } = self;
        inbox.drain(|msg| {
            dispatcher.route(&msg, engine, hw, sink);
        });
    }

    fn broker(&self) -> &MockBroker {
        self.sink.messenger()
    }
}

#[test]
fn start_announces_mode_and_cooling_retained() {
    let rig = Rig::new();
    assert_eq!(
        rig.broker().published,
        [
            (Channel::ModeStatus, "AUTO".to_owned(), true),
            (Channel::CoolingStatus, "INACTIVE".to_owned(), true),
        ]
    );
}

#[test]
fn manual_then_on_drives_cooling_and_publishes_status() {
    let mut rig = Rig::new();
    rig.sink.messenger_mut().clear();

    rig.deliver(Channel::ModeCommand, "MANUAL");
    rig.deliver(Channel::CoolingCommand, "ON");

    assert_eq!(rig.engine.mode(), ControlMode::Manual);
    assert_eq!(rig.engine.actuator(), ActuatorState::On);
    assert_eq!(rig.hw.cooling(), Some(ActuatorState::On));
    assert_eq!(rig.broker().on(Channel::ModeStatus), ["MANUAL"]);
    assert_eq!(rig.broker().on(Channel::CoolingStatus), ["ACTIVE"]);
}

#[test]
fn cooling_command_in_auto_publishes_nothing() {
    let mut rig = Rig::new();
    rig.sink.messenger_mut().clear();

    rig.deliver(Channel::CoolingCommand, "ON");

    assert_eq!(rig.engine.actuator(), ActuatorState::Off);
    assert!(rig.broker().published.is_empty());
    assert_eq!(rig.dispatcher.rejected(), 0, "an ignored command is not a reject");
}

#[test]
fn unknown_payloads_and_topics_are_rejected() {
    let mut rig = Rig::new();
    rig.sink.messenger_mut().clear();

    rig.deliver(Channel::ModeCommand, "manual");
    rig.deliver(Channel::CoolingCommand, "MAYBE");
    assert!(accept_received(&rig.inbox, Some("industrial/other"), b"ON", true));
    // Status topics are outbound only; a retained echo is not a command.
    assert!(accept_received(&rig.inbox, Some(Channel::ModeStatus.topic()), b"MANUAL", true));
    rig.pump();

    assert_eq!(rig.dispatcher.rejected(), 4);
    assert_eq!(rig.engine.mode(), ControlMode::Auto);
    assert!(rig.broker().published.is_empty());
}

#[test]
fn whitespace_around_payload_is_tolerated() {
    let mut rig = Rig::new();
    rig.deliver(Channel::ModeCommand, " MANUAL\r\n");
    assert_eq!(rig.engine.mode(), ControlMode::Manual);
}

#[test]
fn alarm_publishes_alert_and_normal() {
    let mut rig = Rig::new();
    rig.sink.messenger_mut().clear();

    rig.engine.on_reading(Reading::new(38.0, 40.0), &mut rig.hw, &mut rig.sink);
    rig.engine.on_reading(Reading::new(34.0, 40.0), &mut rig.hw, &mut rig.sink);

    assert_eq!(
        rig.broker().on(Channel::Alert),
        ["HIGH_TEMP_ALERT", "TEMP_NORMAL"]
    );
    assert_eq!(rig.broker().on(Channel::CoolingStatus), ["ACTIVE", "INACTIVE"]);
    assert!(rig.broker().published.iter().all(|(_, _, retained)| *retained));
}

#[test]
fn offline_broker_never_disturbs_control() {
    let mut rig = Rig::new();
    rig.sink.messenger_mut().offline = true;

    rig.engine.on_reading(Reading::new(39.0, 40.0), &mut rig.hw, &mut rig.sink);

    assert_eq!(rig.engine.actuator(), ActuatorState::On);
    assert_eq!(rig.hw.alarm(), Some(true));
    assert_eq!(rig.sink.publish_failures(), 2);
}

#[test]
fn telemetry_heartbeat_follows_last_good_reading() {
    let mut rig = Rig::new();
    rig.sink.messenger_mut().clear();
    let mut telemetry = TelemetryScheduler::new(500);

    rig.engine.on_reading(Reading::new(22.5, 55.0), &mut rig.hw, &mut rig.sink);
    telemetry.tick(0, &rig.engine, rig.sink.messenger_mut());
    rig.engine.on_reading(Reading::invalid(), &mut rig.hw, &mut rig.sink);
    telemetry.tick(500, &rig.engine, rig.sink.messenger_mut());

    // Unchanged values are still published every period.
    assert_eq!(rig.broker().on(Channel::Temperature), ["22.50", "22.50"]);
    assert_eq!(rig.broker().on(Channel::Humidity), ["55.00", "55.00"]);
}
