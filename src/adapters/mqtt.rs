//! MQTT adapter.
//!
//! Implements [`MessengerPort`] on top of the ESP-IDF MQTT client and feeds
//! inbound command messages into the shared [`Inbox`].
//!
//! ```text
//!   main loop ──publish()──▶ MqttMessenger ──enqueue──▶ esp-mqtt task
//!                                                          │
//!   Inbox ◀──push()── mqtt-rx thread ◀──conn.next()────────┘
//! ```
//!
//! On every `Connected` event the rx thread (re-)subscribes to the command
//! channels, so a broker restart never leaves the device deaf.  esp-mqtt
//! blocks client calls while an event is held, so the event only arms a
//! [`SessionTracker`] and the subscribe runs once the event is dropped.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `esp_idf_svc::mqtt::client`.
//! - **all other targets**: settings and the receive filter only.

use log::{debug, warn};

use crate::messaging::Inbox;

use super::device_id::ClientIdString;

/// Payloads larger than this are dropped by the receive thread before they
/// reach the inbox.
pub const MAX_RECEIVE_BYTES: usize = 256;

/// Default broker when none is configured at build time.
pub const DEFAULT_BROKER_URL: &str = "mqtt://localhost:1883";

/// Broker connection settings.
#[derive(Debug, Clone)]
pub struct MqttSettings {
    pub url: &'static str,
    pub client_id: ClientIdString,
    pub username: Option<&'static str>,
    pub password: Option<&'static str>,
}

impl MqttSettings {
    /// Settings baked in at build time (`THERMOWATCH_MQTT_URL`,
    /// `THERMOWATCH_MQTT_USERNAME`, `THERMOWATCH_MQTT_PASSWORD`).
    /// Empty values count as unset.
    pub fn from_build_env(client_id: ClientIdString) -> Self {
        Self {
            url: non_empty(option_env!("THERMOWATCH_MQTT_URL")).unwrap_or(DEFAULT_BROKER_URL),
            client_id,
            username: non_empty(option_env!("THERMOWATCH_MQTT_USERNAME")),
            password: non_empty(option_env!("THERMOWATCH_MQTT_PASSWORD")),
        }
    }

    /// Whether the URL asks for TLS.
    pub fn is_tls(&self) -> bool {
        self.url.starts_with("mqtts://") || self.url.starts_with("wss://")
    }
}

fn non_empty(v: Option<&'static str>) -> Option<&'static str> {
    v.filter(|s| !s.is_empty())
}

/// Decide whether one received MQTT event goes into the inbox.
///
/// Fragmented deliveries (`complete == false`), topic-less continuations,
/// and oversize payloads are dropped here.  Returns `true` when the message
/// was queued.
pub fn accept_received(inbox: &Inbox, topic: Option<&str>, data: &[u8], complete: bool) -> bool {
    let Some(topic) = topic else {
        debug!("MQTT: dropping continuation fragment ({} bytes)", data.len());
        return false;
    };
    if !complete {
        warn!("MQTT: dropping fragmented message on '{}'", topic);
        return false;
    }
    if data.len() > MAX_RECEIVE_BYTES {
        warn!("MQTT: dropping oversized payload on '{}' ({} bytes)", topic, data.len());
        return false;
    }
    inbox.push(topic, data).is_ok()
}

/// Broker session bookkeeping for the receive thread.
///
/// The session counts as up only after the command subscriptions went
/// through, so nothing is published to a broker that cannot answer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionTracker {
    subscribe_pending: bool,
    up: bool,
}

impl SessionTracker {
    pub const fn new() -> Self {
        Self {
            subscribe_pending: false,
            up: false,
        }
    }

    /// A (re)connect: subscriptions must be renewed before the session is up.
    pub fn on_connected(&mut self) {
        self.subscribe_pending = true;
        self.up = false;
    }

    pub fn on_disconnected(&mut self) {
        self.subscribe_pending = false;
        self.up = false;
    }

    /// Whether a subscribe is owed to the broker.
    pub fn subscribe_pending(&self) -> bool {
        self.subscribe_pending
    }

    /// Record a subscribe attempt.  A failed one stays pending.
    pub fn on_subscribed(&mut self, ok: bool) {
        if ok {
            self.subscribe_pending = false;
            self.up = true;
        }
    }

    pub fn is_up(&self) -> bool {
        self.up
    }
}

#[cfg(target_os = "espidf")]
pub use esp::MqttMessenger;

#[cfg(target_os = "espidf")]
mod esp {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};
    use std::thread;
    use std::time::Duration;

    use esp_idf_svc::mqtt::client::{
        Details, EspMqttClient, EspMqttConnection, EventPayload, MqttClientConfiguration, QoS,
    };
    use log::{error, info, warn};

    use super::{accept_received, MqttSettings, SessionTracker};
    use crate::app::ports::MessengerPort;
    use crate::error::CommsError;
    use crate::messaging::{Channel, Inbox};

    type SharedClient = Arc<Mutex<EspMqttClient<'static>>>;

    const SUBSCRIBE_ATTEMPTS: u32 = 3;
    const SUBSCRIBE_RETRY_MS: u64 = 500;

    pub struct MqttMessenger {
        client: SharedClient,
        connected: Arc<AtomicBool>,
    }

    impl MqttMessenger {
        /// Create the client and start the receive thread.  The broker
        /// connection itself is established (and re-established) in the
        /// background by esp-mqtt.
        pub fn start(settings: &MqttSettings, inbox: &'static Inbox) -> Result<Self, CommsError> {
            let conf = MqttClientConfiguration {
                client_id: Some(settings.client_id.as_str()),
                username: settings.username,
                password: settings.password,
                crt_bundle_attach: if settings.is_tls() {
                    Some(esp_idf_svc::sys::esp_crt_bundle_attach)
                } else {
                    None
                },
                ..Default::default()
            };

            let (client, conn) = EspMqttClient::new(settings.url, &conf).map_err(|e| {
                error!("MQTT: client init for {} failed: {}", settings.url, e);
                CommsError::MqttConnectFailed
            })?;
            info!("MQTT: client '{}' -> {}", settings.client_id, settings.url);

            let client = Arc::new(Mutex::new(client));
            let connected = Arc::new(AtomicBool::new(false));
            spawn_receiver(conn, client.clone(), connected.clone(), inbox)?;

            Ok(Self { client, connected })
        }

        pub fn is_connected(&self) -> bool {
            self.connected.load(Ordering::Relaxed)
        }

        /// Block until the first broker session is up, or `timeout_ms`
        /// elapses.  Returns whether the session is up.
        pub fn wait_connected(&self, timeout_ms: u32) -> bool {
            const STEP_MS: u32 = 100;
            let mut waited = 0;
            while !self.is_connected() && waited < timeout_ms {
                thread::sleep(Duration::from_millis(u64::from(STEP_MS)));
                waited += STEP_MS;
            }
            self.is_connected()
        }
    }

    impl MessengerPort for MqttMessenger {
        fn publish(
            &mut self,
            channel: Channel,
            payload: &str,
            retained: bool,
        ) -> Result<(), CommsError> {
            if !self.is_connected() {
                return Err(CommsError::MqttPublishFailed);
            }
            let mut client = self.client.lock().map_err(|_| CommsError::MqttPublishFailed)?;
            client
                .enqueue(channel.topic(), QoS::AtLeastOnce, retained, payload.as_bytes())
                .map(|_| ())
                .map_err(|_| CommsError::MqttPublishFailed)
        }
    }

    fn subscribe_commands(client: &SharedClient) -> Result<(), CommsError> {
        let mut client = client.lock().map_err(|_| CommsError::MqttSubscribeFailed)?;
        for channel in Channel::SUBSCRIPTIONS {
            client
                .subscribe(channel.topic(), QoS::AtLeastOnce)
                .map_err(|_| CommsError::MqttSubscribeFailed)?;
            info!("MQTT: subscribed to '{}'", channel.topic());
        }
        Ok(())
    }

    fn spawn_receiver(
        mut conn: EspMqttConnection,
        client: SharedClient,
        connected: Arc<AtomicBool>,
        inbox: &'static Inbox,
    ) -> Result<(), CommsError> {
        thread::Builder::new()
            .name("mqtt-rx".into())
            .stack_size(6 * 1024)
            .spawn(move || {
                let mut session = SessionTracker::new();
                loop {
                    // No event is held here, so the client is free.
                    let mut attempt = 0;
                    while session.subscribe_pending() && attempt < SUBSCRIBE_ATTEMPTS {
                        if attempt > 0 {
                            thread::sleep(Duration::from_millis(SUBSCRIBE_RETRY_MS));
                        }
                        attempt += 1;
                        let result = subscribe_commands(&client);
                        if let Err(e) = result {
                            warn!("MQTT: subscribe attempt {} failed: {}", attempt, e);
                        }
                        session.on_subscribed(result.is_ok());
                        connected.store(session.is_up(), Ordering::Relaxed);
                    }

                    let event = match conn.next() {
                        Ok(event) => event,
                        Err(_) => break,
                    };
                    match event.payload() {
                        EventPayload::Connected(_) => {
                            info!("MQTT: connected");
                            session.on_connected();
                        }
                        EventPayload::Disconnected => {
                            warn!("MQTT: disconnected, client will retry");
                            session.on_disconnected();
                            connected.store(false, Ordering::Relaxed);
                        }
                        EventPayload::Received {
                            topic, data, details, ..
                        } => {
                            let complete = matches!(details, Details::Complete);
                            accept_received(inbox, topic, data, complete);
                        }
                        EventPayload::Error(e) => warn!("MQTT: {:?}", e),
                        _ => {}
                    }
                }
                connected.store(false, Ordering::Relaxed);
                info!("MQTT: connection closed, receive thread exiting");
            })
            .map(|_| ())
            .map_err(|_| CommsError::MqttConnectFailed)
    }
}
