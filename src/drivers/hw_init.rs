//! One-shot hardware peripheral initialization and raw GPIO/time helpers.
//!
//! Configures the relay outputs (idle HIGH — the relay board is
//! active-low), the sensor trigger output (idle LOW) and the echo input
//! using raw ESP-IDF sys calls.  Called once from `main()` before any
//! driver touches a pin.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: real register access. On host/test: no-op stubs plus a
//! process-monotonic clock, so the library links and the domain tests run
//! without hardware.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use crate::config::DeskConfig;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
        }
    }
}

// ── Peripheral init ───────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub fn init_peripherals(config: &DeskConfig) -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before any driver runs; single-threaded.
    unsafe {
        // Relay outputs first, driven HIGH (released) before anything else
        // can observe them.
        for &pin in &[config.up_pin, config.down_pin] {
            init_output(pin)?;
            gpio_set_level(pin, 1);
        }

        // Sensor trigger: output, idle LOW.
        init_output(config.trigger_pin)?;
        gpio_set_level(config.trigger_pin, 0);

        // Sensor echo: plain input — the sensor drives the line (through a
        // divider on 5 V boards).
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << config.echo_pin,
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = gpio_config(&cfg);
        if ret != ESP_OK as i32 {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
    }
    log::info!(
        "hw_init: GPIO configured (up={}, down={}, trig={}, echo={})",
        config.up_pin,
        config.down_pin,
        config.trigger_pin,
        config.echo_pin
    );
    Ok(())
}

#[cfg(target_os = "espidf")]
unsafe fn init_output(pin: i32) -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pin,
        mode: gpio_mode_t_GPIO_MODE_OUTPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed(ret));
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals(_config: &DeskConfig) -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── GPIO helpers ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin; safe to call from any task.
    (unsafe { gpio_get_level(pin) }) != 0
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_pin: i32) -> bool {
    false
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin;
    // pin was validated during init_peripherals().
    unsafe {
        gpio_set_level(pin, if high { 1 } else { 0 });
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) {}

// ── Monotonic clock ───────────────────────────────────────────

/// Microseconds since boot (monotonic).
#[cfg(target_os = "espidf")]
pub fn now_us() -> u64 {
    // SAFETY: esp_timer_get_time is a monotonic counter read.
    (unsafe { esp_timer_get_time() }) as u64
}

#[cfg(not(target_os = "espidf"))]
pub fn now_us() -> u64 {
    use std::sync::OnceLock;
    use std::time::Instant;
    static START: OnceLock<Instant> = OnceLock::new();
    START.get_or_init(Instant::now).elapsed().as_micros() as u64
}

// ── Delays ────────────────────────────────────────────────────

/// Block for `us` microseconds.  Sub-millisecond delays spin (the trigger
/// pulse must stay tight); longer ones yield to the scheduler.
#[cfg(target_os = "espidf")]
pub fn delay_us(us: u32) {
    if us >= 1_000 {
        esp_idf_hal::delay::FreeRtos::delay_ms(us / 1_000);
    } else {
        esp_idf_hal::delay::Ets::delay_us(us);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn delay_us(us: u32) {
    std::thread::sleep(std::time::Duration::from_micros(u64::from(us)));
}
