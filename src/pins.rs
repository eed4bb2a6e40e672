//! GPIO / peripheral pin assignments for the Thermowatch board (ESP32 DevKit).
//!
//! Single source of truth for pin numbers.  `drivers::hw_init` claims the
//! matching typed esp-idf-hal pins; the DHT22 bit-banger uses the raw
//! number directly.

// ---------------------------------------------------------------------------
// Sensor
// ---------------------------------------------------------------------------

/// DHT22 single-wire data line (open-drain, external 10 kΩ pull-up).
pub const DHT_GPIO: i32 = 14;

// ---------------------------------------------------------------------------
// Actuators
// ---------------------------------------------------------------------------

/// Cooling damper servo signal (LEDC channel 0, 50 Hz).
pub const SERVO_GPIO: i32 = 4;
/// Piezo buzzer (LEDC channel 1, square wave at `config::BUZZER_FREQ_HZ`).
pub const BUZZER_GPIO: i32 = 26;
/// Alarm LED, active high.
pub const ALARM_LED_GPIO: i32 = 27;

// ---------------------------------------------------------------------------
// Buttons (active-low, internal pull-up)
// ---------------------------------------------------------------------------

/// Button 1: cooling toggle.
pub const COOLING_BUTTON_GPIO: i32 = 2;
/// Button 2: auto/manual toggle.
pub const MODE_BUTTON_GPIO: i32 = 15;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// Servo frame rate.  The timer runs at 14-bit resolution (~1.2 µs steps).
pub const SERVO_PWM_FREQ_HZ: u32 = 50;

/// Every GPIO claimed by the board, for the boot log.
pub const ALL: [(&str, i32); 6] = [
    ("dht22", DHT_GPIO),
    ("servo", SERVO_GPIO),
    ("buzzer", BUZZER_GPIO),
    ("alarm_led", ALARM_LED_GPIO),
    ("btn_cooling", COOLING_BUTTON_GPIO),
    ("btn_mode", MODE_BUTTON_GPIO),
];
