//! DHT22 (AM2302) temperature / humidity sensor.
//!
//! Single-wire protocol, open-drain with pull-up.  One transaction yields a
//! 40-bit frame:
//!
//! | Bytes | Content                                        |
//! |-------|------------------------------------------------|
//! | 0..2  | humidity × 10, big-endian                      |
//! | 2..4  | temperature × 10, big-endian, bit 15 = negative |
//! | 4     | low byte of the sum of bytes 0..4              |
//!
//! The sensor needs 2 s between conversions; polls inside that window
//! yield no sample, so every returned reading is a fresh conversion.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: bit-bangs the line with raw GPIO calls inside a critical
//! section.  On host/test: returns a frame injected with [`sim_set_frame`].

use log::warn;

use crate::config::SENSOR_MIN_INTERVAL_MS;
use crate::control::Reading;
use crate::error::SensorError;

pub const TEMP_MIN_C: f32 = -40.0;
pub const TEMP_MAX_C: f32 = 80.0;
pub const HUMIDITY_MAX_PCT: f32 = 100.0;

pub type Frame = [u8; 5];

/// Decode a raw frame into `(temperature_c, humidity_pct)`.
pub fn decode_frame(frame: Frame) -> Result<(f32, f32), SensorError> {
    let sum = frame[..4].iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    if sum != frame[4] {
        return Err(SensorError::ChecksumMismatch);
    }

    let humidity = f32::from(u16::from_be_bytes([frame[0], frame[1]])) / 10.0;
    let raw_t = u16::from_be_bytes([frame[2] & 0x7F, frame[3]]);
    let mut temperature = f32::from(raw_t) / 10.0;
    if frame[2] & 0x80 != 0 {
        temperature = -temperature;
    }

    if !(TEMP_MIN_C..=TEMP_MAX_C).contains(&temperature) || humidity > HUMIDITY_MAX_PCT {
        return Err(SensorError::OutOfRange);
    }
    Ok((temperature, humidity))
}

pub struct Dht22 {
    gpio: i32,
    min_interval_ms: u64,
    last_at: Option<u64>,
    failures: u32,
}

impl Dht22 {
    pub fn new(gpio: i32) -> Self {
        Self {
            gpio,
            min_interval_ms: u64::from(SENSOR_MIN_INTERVAL_MS),
            last_at: None,
            failures: 0,
        }
    }

    /// Sample the sensor.  Returns `None` while the sensor is still inside
    /// its minimum conversion interval; a failed conversion also starts a
    /// new interval.
    pub fn read(&mut self, now_ms: u64) -> Option<Reading> {
        if let Some(at) = self.last_at {
            if now_ms.saturating_sub(at) < self.min_interval_ms {
                return None;
            }
        }
        self.last_at = Some(now_ms);

        let reading = match self.read_frame().and_then(decode_frame) {
            Ok((t, h)) => Reading::new(t, h),
            Err(e) => {
                self.failures = self.failures.wrapping_add(1);
                warn!("DHT22 on GPIO{}: {}", self.gpio, e);
                Reading::invalid()
            }
        };
        Some(reading)
    }

    /// Physical reads that failed since boot.
    pub fn failures(&self) -> u32 {
        self.failures
    }

    #[cfg(target_os = "espidf")]
    fn read_frame(&mut self) -> Result<Frame, SensorError> {
        use esp_idf_hal::delay::Ets;
        use esp_idf_sys::gpio_set_level;

        let pin = self.gpio;

        // Host start signal: hold the line low for >1 ms, then release.
        // SAFETY: the line was configured open-drain by hw_init and is only
        // touched by this driver from the main loop.
        unsafe { gpio_set_level(pin, 0) };
        Ets::delay_us(START_LOW_US);
        unsafe { gpio_set_level(pin, 1) };

        esp_idf_hal::interrupt::free(|| {
            // Response: ~80 µs low, ~80 µs high, then the first bit.
            wait_for(pin, false, 100)?;
            wait_for(pin, true, 100)?;
            wait_for(pin, false, 100)?;

            let mut frame = [0u8; 5];
            for bit in 0..40 {
                wait_for(pin, true, 70)?;
                let high_us = wait_for(pin, false, 100)?;
                if high_us > ONE_THRESHOLD_US {
                    frame[bit / 8] |= 0x80 >> (bit % 8);
                }
            }
            Ok(frame)
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_frame(&mut self) -> Result<Frame, SensorError> {
        sim::frame()
    }
}

#[cfg(target_os = "espidf")]
const START_LOW_US: u32 = 1_100;
/// A bit's high phase is ~27 µs for 0 and ~70 µs for 1.
#[cfg(target_os = "espidf")]
const ONE_THRESHOLD_US: u32 = 40;

/// Busy-wait until the line reads `high`; returns the microseconds waited.
#[cfg(target_os = "espidf")]
fn wait_for(pin: i32, high: bool, timeout_us: u32) -> Result<u32, SensorError> {
    use esp_idf_sys::{esp_timer_get_time, gpio_get_level};

    // SAFETY: timer and GPIO level reads are plain register reads.
    let start = unsafe { esp_timer_get_time() };
    loop {
        let level = unsafe { gpio_get_level(pin) } != 0;
        let elapsed = (unsafe { esp_timer_get_time() } - start) as u32;
        if level == high {
            return Ok(elapsed);
        }
        if elapsed > timeout_us {
            return Err(SensorError::Timeout);
        }
    }
}

#[cfg(not(target_os = "espidf"))]
mod sim {
    use core::sync::atomic::{AtomicU64, Ordering};

    use super::Frame;
    use crate::error::SensorError;

    /// Bit 40 set = sensor present; low 40 bits = frame.
    const PRESENT: u64 = 1 << 40;
    /// 24.0 °C, 45.0 %.
    static SIM_FRAME: AtomicU64 = AtomicU64::new(PRESENT | 0x01_C2_00_F0_B3);

    pub fn set(frame: Option<Frame>) {
        let bits = frame.map_or(0, |f| {
            f.iter().fold(0, |acc, b| (acc << 8) | u64::from(*b)) | PRESENT
        });
        SIM_FRAME.store(bits, Ordering::Relaxed);
    }

    pub fn frame() -> Result<Frame, SensorError> {
        let bits = SIM_FRAME.load(Ordering::Relaxed);
        if bits & PRESENT == 0 {
            return Err(SensorError::Timeout);
        }
        let b = bits.to_be_bytes();
        Ok([b[3], b[4], b[5], b[6], b[7]])
    }
}

/// Inject the next frame the simulated sensor returns; `None` simulates a
/// sensor that does not answer.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_frame(frame: Option<Frame>) {
    sim::set(frame);
}
