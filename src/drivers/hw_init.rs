//! One-shot hardware peripheral initialization.
//!
//! Claims the board's GPIO and LEDC peripherals through esp-idf-hal and
//! hands back a [`Board`] of typed drivers.  Called once from `main()`
//! before the control loop starts.  Pin numbers mirror [`crate::pins`].

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    LedcInitFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::LedcInitFailed(rc) => write!(f, "LEDC timer/channel config failed (rc={})", rc),
        }
    }
}

impl core::error::Error for HwInitError {}

#[cfg(target_os = "espidf")]
pub use esp::{init_peripherals, Board};

#[cfg(target_os = "espidf")]
mod esp {
    use esp_idf_hal::gpio::{AnyIOPin, AnyOutputPin, IOPin, Input, Output, OutputPin, PinDriver, Pull};
    use esp_idf_hal::ledc::{config::TimerConfig, LedcDriver, LedcTimerDriver, Resolution};
    use esp_idf_hal::modem::Modem;
    use esp_idf_hal::prelude::*;
    use esp_idf_sys::EspError;
    use log::info;

    use super::HwInitError;
    use crate::config::BUZZER_FREQ_HZ;
    use crate::pins;

    /// Every peripheral the firmware drives, already configured.
    pub struct Board {
        pub cooling_button: PinDriver<'static, AnyIOPin, Input>,
        pub mode_button: PinDriver<'static, AnyIOPin, Input>,
        pub alarm_led: PinDriver<'static, AnyOutputPin, Output>,
        pub servo: LedcDriver<'static>,
        pub buzzer: LedcDriver<'static>,
        pub modem: Modem,
    }

    fn gpio_err(e: EspError) -> HwInitError {
        HwInitError::GpioConfigFailed(e.code())
    }

    fn ledc_err(e: EspError) -> HwInitError {
        HwInitError::LedcInitFailed(e.code())
    }

    /// The DHT22 line is bit-banged with raw calls, so it is configured
    /// here rather than claimed as a typed pin.
    fn init_dht_line() -> Result<(), HwInitError> {
        use esp_idf_sys::*;

        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pins::DHT_GPIO,
            mode: gpio_mode_t_GPIO_MODE_INPUT_OUTPUT_OD,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        // SAFETY: called once from init_peripherals() before the loop starts;
        // GPIO14 is not claimed by any typed driver.
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
        unsafe { gpio_set_level(pins::DHT_GPIO, 1) };
        info!("hw_init: DHT22 line on GPIO{} (open-drain)", pins::DHT_GPIO);
        Ok(())
    }

    pub fn init_peripherals(p: Peripherals) -> Result<Board, HwInitError> {
        // Buttons: active-low, internal pull-up.
        let mut cooling_button = PinDriver::input(p.pins.gpio2.downgrade()).map_err(gpio_err)?;
        cooling_button.set_pull(Pull::Up).map_err(gpio_err)?;
        let mut mode_button = PinDriver::input(p.pins.gpio15.downgrade()).map_err(gpio_err)?;
        mode_button.set_pull(Pull::Up).map_err(gpio_err)?;
        info!(
            "hw_init: buttons on GPIO{} / GPIO{}",
            pins::COOLING_BUTTON_GPIO,
            pins::MODE_BUTTON_GPIO
        );

        let mut alarm_led =
            PinDriver::output(p.pins.gpio27.downgrade_output()).map_err(gpio_err)?;
        alarm_led.set_low().map_err(gpio_err)?;

        // Timer 0: servo frame (50 Hz, 14-bit).
        let servo_timer = LedcTimerDriver::new(
            p.ledc.timer0,
            &TimerConfig::default()
                .frequency(pins::SERVO_PWM_FREQ_HZ.Hz().into())
                .resolution(Resolution::Bits14),
        )
        .map_err(ledc_err)?;
        let servo = LedcDriver::new(p.ledc.channel0, servo_timer, p.pins.gpio4).map_err(ledc_err)?;

        // Timer 1: buzzer tone (1 kHz, 8-bit), silent until the alarm fires.
        let buzzer_timer = LedcTimerDriver::new(
            p.ledc.timer1,
            &TimerConfig::default()
                .frequency(BUZZER_FREQ_HZ.Hz().into())
                .resolution(Resolution::Bits8),
        )
        .map_err(ledc_err)?;
        let mut buzzer =
            LedcDriver::new(p.ledc.channel1, buzzer_timer, p.pins.gpio26).map_err(ledc_err)?;
        buzzer.set_duty(0).map_err(ledc_err)?;

        info!(
            "hw_init: LEDC configured (servo=CH0 GPIO{}, buzzer=CH1 GPIO{}), LED GPIO{}",
            pins::SERVO_GPIO,
            pins::BUZZER_GPIO,
            pins::ALARM_LED_GPIO
        );

        init_dht_line()?;

        Ok(Board {
            cooling_button,
            mode_button,
            alarm_led,
            servo,
            buzzer,
            modem: p.modem,
        })
    }
}
