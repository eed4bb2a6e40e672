//! ESP32 time adapter.
//!
//! Monotonic milliseconds since boot for the control loop's timers.
//!
//! - **`target_os = "espidf"`**: wraps `esp_timer_get_time()` from the
//!   ESP-IDF high-resolution timer (microsecond precision, monotonic).
//! - **`not(target_os = "espidf")`**: uses `std::time::Instant` for
//!   host-side testing and simulation.

/// Monotonic clock for the ESP32 platform.
pub struct MonotonicClock {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Milliseconds since boot.
    #[cfg(target_os = "espidf")]
    pub fn uptime_ms(&self) -> u64 {
        // SAFETY: esp_timer_get_time is a read of the free-running timer.
        (unsafe { esp_idf_sys::esp_timer_get_time() }) as u64 / 1_000
    }

    /// Milliseconds since boot.
    #[cfg(not(target_os = "espidf"))]
    pub fn uptime_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    /// Seconds since boot.
    pub fn uptime_secs(&self) -> u64 {
        self.uptime_ms() / 1_000
    }
}
