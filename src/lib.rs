//! Thermowatch firmware library.
//!
//! Exposes every module for the firmware binary and for host-side
//! integration tests. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod control;
pub mod diagnostics;
pub mod error;
pub mod messaging;
pub mod telemetry;

// Hardware-facing modules; their ESP-IDF halves are cfg-gated inside.
pub mod adapters;
pub mod drivers;
pub mod pins;
pub mod sensors;
