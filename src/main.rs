//! Thermowatch Firmware: Main Entry Point
//!
//! Single cooperative loop over hexagonal ports.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter     ButtonPanel     MqttMessenger  WifiLink   │
//! │  (Sensor+Actuator)   (InputPort)     (Messenger)    (link)     │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │           ControlEngine (pure logic)                   │    │
//! │  │  Hysteresis · Mode · Actuator override                 │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Inbox → Dispatcher · MessengerSink · TelemetryScheduler       │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::{anyhow, Result};
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::prelude::Peripherals;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use log::{info, warn};

use thermowatch::adapters::device_id;
use thermowatch::adapters::hardware::HardwareAdapter;
use thermowatch::adapters::mqtt::{MqttMessenger, MqttSettings};
use thermowatch::adapters::time::MonotonicClock;
use thermowatch::adapters::wifi::{WifiCredentials, WifiLink};
use thermowatch::app::commands::Button;
use thermowatch::app::ports::{InputPort, SensorPort};
use thermowatch::app::service::ControlEngine;
use thermowatch::config::SystemConfig;
use thermowatch::diagnostics::{DiagnosticsReport, ReportTimer};
use thermowatch::drivers::alarm::AlarmDriver;
use thermowatch::drivers::button::ButtonPanel;
use thermowatch::drivers::hw_init;
use thermowatch::drivers::servo::ServoDriver;
use thermowatch::messaging::dispatch::Dispatcher;
use thermowatch::messaging::publisher::MessengerSink;
use thermowatch::messaging::Inbox;
use thermowatch::pins;
use thermowatch::sensors::Dht22;
use thermowatch::telemetry::TelemetryScheduler;

/// Filled by the mqtt-rx thread, drained once per loop iteration.
static INBOX: Inbox = Inbox::new();

/// How long boot waits for the first broker session before announcing
/// the initial state anyway.
const MQTT_BOOT_WAIT_MS: u32 = 10_000;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Thermowatch v{}                  ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = SystemConfig::default();
    config.validate().map_err(|e| anyhow!("invalid config: {e}"))?;
    info!("Config: {}", serde_json::to_string(&config)?);
    for (name, gpio) in pins::ALL {
        info!("  {:<12} GPIO{}", name, gpio);
    }

    // ── 2. Peripherals ────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let board = hw_init::init_peripherals(peripherals)?;

    let mut hw = HardwareAdapter::new(
        Dht22::new(pins::DHT_GPIO),
        ServoDriver::new(board.servo),
        AlarmDriver::new(board.alarm_led, board.buzzer),
    );
    let mut buttons = ButtonPanel::new(board.cooling_button, board.mode_button, FreeRtos);

    // ── 3. Network ────────────────────────────────────────────
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = match EspDefaultNvsPartition::take() {
        Ok(p) => Some(p),
        Err(e) => {
            warn!("NVS partition unavailable ({}), WiFi runs without it", e);
            None
        }
    };

    let creds = WifiCredentials::from_build_env()?;
    let mut wifi = WifiLink::connect(board.modem, sysloop, nvs, &creds)?;

    let settings = MqttSettings::from_build_env(device_id::client_id(&device_id::read_mac()));
    let messenger = MqttMessenger::start(&settings, &INBOX)?;
    if !messenger.wait_connected(MQTT_BOOT_WAIT_MS) {
        warn!("MQTT: no broker session after {} ms, continuing offline", MQTT_BOOT_WAIT_MS);
    }
    let mut sink = MessengerSink::new(messenger);

    // ── 4. Control engine ─────────────────────────────────────
    let mut engine = ControlEngine::new(&config);
    engine.start(&mut hw, &mut sink);

    let clock = MonotonicClock::new();
    let mut dispatcher = Dispatcher::new();
    let mut telemetry = TelemetryScheduler::new(config.telemetry_interval_ms);
    let mut report_timer = ReportTimer::new(config.diagnostics_interval_ms);

    info!("System ready. Entering control loop.");

    // ── 5. Main loop ──────────────────────────────────────────
    loop {
        if let Some(reading) = hw.read() {
            engine.on_reading(reading, &mut hw, &mut sink);
        }

        for button in Button::ALL {
            if buttons.poll_edge(button) {
                engine.on_button(button, &mut hw, &mut sink);
            }
        }

        INBOX.drain(|msg| {
            dispatcher.route(&msg, &mut engine, &mut hw, &mut sink);
        });

        let now = clock.uptime_ms();
        telemetry.tick(now, &engine, sink.messenger_mut());
        hw.service(now);
        wifi.poll(now);

        if report_timer.due(now) {
            let report = DiagnosticsReport {
                uptime_secs: clock.uptime_secs(),
                snapshot: engine.snapshot(),
                counters: engine.diagnostics(),
                rejected_messages: dispatcher.rejected(),
                inbox_dropped: INBOX.dropped(),
            };
            match report.to_json() {
                Ok(json) => info!("DIAG | {}", json),
                Err(e) => warn!("DIAG | serialise failed: {}", e),
            }
            info!(
                "DIAG | publish failures: events={} telemetry={} sensor_faults={}",
                sink.publish_failures(),
                telemetry.failures(),
                hw.sensor_failures()
            );
        }

        FreeRtos::delay_ms(config.loop_interval_ms);
    }
}
