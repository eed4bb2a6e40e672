//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against mock adapters.  All tests run on the host (x86_64) with no
//! real hardware or broker required.

mod dispatch_tests;
mod engine_tests;
mod hardware_tests;
mod mock_hw;
