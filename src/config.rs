//! System configuration parameters
//!
//! All tunable parameters for the desk controller: GPIO wiring, the sensing
//! ceiling, the valid target-height window, preset heights, convergence
//! tolerance, the move deadline, and the sampling profile.  Values can be
//! overridden through environment variables at startup and are validated
//! before the service is allowed to exist.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::pins;
use crate::sensors::height::MAX_SAMPLE_COUNT;

/// Microseconds of round-trip echo time per centimetre of range, at roughly
/// 340 m/s.  `max_distance_cm * US_PER_CM` bounds every echo busy-wait.
const US_PER_CM: u64 = 60;

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeskConfig {
    // --- Wiring ---
    /// GPIO driving the "up" relay (active-low).
    pub up_pin: i32,
    /// GPIO driving the "down" relay (active-low).
    pub down_pin: i32,
    /// GPIO driving the sensor trigger line.
    pub trigger_pin: i32,
    /// GPIO reading the sensor echo line.
    pub echo_pin: i32,

    // --- Sensing ---
    /// Maximum distance (cm) the sensor is trusted to report; also bounds
    /// the echo busy-wait.
    pub max_distance_cm: u32,
    /// Pulses taken per height estimate.
    pub sample_count: usize,
    /// Delay between consecutive pulses (ms), to avoid echo cross-talk.
    pub sample_settle_ms: u32,
    /// Samples further than this many standard deviations from the round
    /// mean are discarded.
    pub outlier_sigma: f32,

    // --- Movement ---
    /// Lowest height (cm) the desk can physically reach.
    pub min_height_cm: u16,
    /// Highest height (cm) the desk can physically reach.
    pub max_height_cm: u16,
    /// Preset 1: sitting height (cm).
    pub sit_height_cm: u16,
    /// Preset 2: standing height (cm).
    pub stand_height_cm: u16,
    /// Convergence band (cm): a move ends when the rounded height is within
    /// this distance of the target.
    pub tolerance_cm: u16,
    /// Hard deadline (s) for a single move; the relay is released when it
    /// elapses even if the desk never arrived.
    pub move_timeout_secs: u32,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            // Wiring
            up_pin: pins::UP_RELAY_GPIO,
            down_pin: pins::DOWN_RELAY_GPIO,
            trigger_pin: pins::TRIGGER_GPIO,
            echo_pin: pins::ECHO_GPIO,

            // Sensing
            max_distance_cm: pins::MAX_DISTANCE_CM,
            sample_count: 10,
            sample_settle_ms: 25,
            outlier_sigma: 2.0,

            // Movement
            min_height_cm: 65,
            max_height_cm: 125,
            sit_height_cm: 70,
            stand_height_cm: 120,
            tolerance_cm: 1,
            move_timeout_secs: 30,
        }
    }
}

impl DeskConfig {
    /// Build a configuration from the environment, falling back to defaults
    /// for anything unset.  An override that exists but does not parse is a
    /// fatal [`ConfigError`] — a typo must not silently run with defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let d = Self::default();
        let cfg = Self {
            up_pin: env_parse("UP_PIN", d.up_pin)?,
            down_pin: env_parse("DOWN_PIN", d.down_pin)?,
            trigger_pin: env_parse("TRIGGER_PIN", d.trigger_pin)?,
            echo_pin: env_parse("ECHO_PIN", d.echo_pin)?,
            max_distance_cm: env_parse("MAX_DISTANCE", d.max_distance_cm)?,
            min_height_cm: env_parse("MIN_HEIGHT", d.min_height_cm)?,
            max_height_cm: env_parse("MAX_HEIGHT", d.max_height_cm)?,
            sit_height_cm: env_parse("SIT_HEIGHT", d.sit_height_cm)?,
            stand_height_cm: env_parse("STAND_HEIGHT", d.stand_height_cm)?,
            tolerance_cm: env_parse("TOLERANCE", d.tolerance_cm)?,
            move_timeout_secs: env_parse("MOVE_TIMEOUT_SECS", d.move_timeout_secs)?,
            ..d
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Range-check every field.  Called by
    /// [`DeskService::new`](crate::app::service::DeskService::new); an `Err`
    /// here must prevent the controller from being constructed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let pins = [self.up_pin, self.down_pin, self.trigger_pin, self.echo_pin];
        if pins.iter().any(|&p| p < 0) {
            return Err(ConfigError::ValidationFailed("pin numbers must be >= 0"));
        }
        for i in 0..pins.len() {
            for j in (i + 1)..pins.len() {
                if pins[i] == pins[j] {
                    return Err(ConfigError::ValidationFailed("pin assignments must be distinct"));
                }
            }
        }
        if self.max_distance_cm == 0 {
            return Err(ConfigError::ValidationFailed("max_distance_cm must be > 0"));
        }
        if self.min_height_cm >= self.max_height_cm {
            return Err(ConfigError::ValidationFailed(
                "min_height_cm must be below max_height_cm",
            ));
        }
        if u32::from(self.max_height_cm) > self.max_distance_cm {
            return Err(ConfigError::ValidationFailed(
                "max_height_cm exceeds the sensing ceiling",
            ));
        }
        for preset in [self.sit_height_cm, self.stand_height_cm] {
            if preset < self.min_height_cm || preset > self.max_height_cm {
                return Err(ConfigError::ValidationFailed(
                    "preset height outside min/max range",
                ));
            }
        }
        if self.tolerance_cm == 0 {
            return Err(ConfigError::ValidationFailed(
                "tolerance_cm of 0 would chatter against sensor noise",
            ));
        }
        if self.move_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed("move_timeout_secs must be > 0"));
        }
        if self.sample_count == 0 || self.sample_count > MAX_SAMPLE_COUNT {
            return Err(ConfigError::ValidationFailed(
                "sample_count outside 1..=MAX_SAMPLE_COUNT",
            ));
        }
        if !(self.outlier_sigma.is_finite() && self.outlier_sigma > 0.0) {
            return Err(ConfigError::ValidationFailed(
                "outlier_sigma must be finite and > 0",
            ));
        }
        Ok(())
    }

    /// Upper bound (µs) for each echo busy-wait phase, derived from the
    /// sensing ceiling.
    pub fn echo_timeout_us(&self) -> u64 {
        u64::from(self.max_distance_cm) * US_PER_CM
    }

    /// Move deadline in milliseconds.
    pub fn move_timeout_ms(&self) -> u64 {
        u64::from(self.move_timeout_secs) * 1_000
    }
}

/// Read an environment override, falling back to `default` when the variable
/// is unset.  Present-but-unparseable is an error.
fn env_parse<T: core::str::FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::EnvParse(var)),
        Err(_) => Ok(default),
    }
}
