//! Sensor drivers.
//!
//! Thermowatch has a single sensor, the DHT22 on [`pins::DHT_GPIO`](crate::pins::DHT_GPIO).
//! It is exposed to the engine through
//! [`HardwareAdapter`](crate::adapters::hardware::HardwareAdapter), which
//! implements [`SensorPort`](crate::app::ports::SensorPort).

pub mod dht22;

pub use dht22::Dht22;
