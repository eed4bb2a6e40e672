//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements               | Connects to                 |
//! |-------------|--------------------------|-----------------------------|
//! | `hardware`  | SensorPort, ActuatorPort | DHT22, servo, LED + buzzer  |
//! | `mqtt`      | MessengerPort            | ESP-IDF MQTT client         |
//! | `wifi`      |                          | ESP-IDF WiFi STA            |
//! | `time`      |                          | ESP32 system timer          |
//! | `device_id` |                          | eFuse MAC                   |
//!
//! The button panel (`drivers::button::ButtonPanel`) implements InputPort
//! directly and the status publisher (`messaging::publisher`) implements
//! EventSink.

pub mod device_id;
pub mod hardware;
pub mod mqtt;
pub mod time;
pub mod wifi;
