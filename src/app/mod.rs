//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the control rules for Thermowatch: hysteresis
//! alarm evaluation and auto/manual arbitration between local buttons and
//! remote commands.  All interaction with hardware and the broker happens
//! through **port traits** defined in [`ports`], keeping this layer fully
//! testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
