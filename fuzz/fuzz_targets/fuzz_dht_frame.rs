//! Fuzz target: `dht22::decode_frame`
//!
//! Any 5-byte frame either fails cleanly or decodes to a value inside the
//! sensor's physical range.
//!
//! cargo fuzz run fuzz_dht_frame

#![no_main]

use libfuzzer_sys::fuzz_target;
use thermowatch::sensors::dht22::{decode_frame, HUMIDITY_MAX_PCT, TEMP_MAX_C, TEMP_MIN_C};

fuzz_target!(|frame: [u8; 5]| {
    if let Ok((t, h)) = decode_frame(frame) {
        assert!((TEMP_MIN_C..=TEMP_MAX_C).contains(&t));
        assert!((0.0..=HUMIDITY_MAX_PCT).contains(&h));
    }
});
