//! Unified error types for the desklift firmware.
//!
//! A single `Error` enum that every fallible subsystem converts into, so the
//! service layer and the HTTP handlers deal with one type.  All variants are
//! `Copy` so they can be passed around without allocation.
//!
//! Two conditions from the failure taxonomy are deliberately **not** errors:
//! an echo timeout degrades the reading to 0 inside the sampler, and a move
//! deadline surfaces as [`MoveOutcome::TimedOut`](crate::control::motion::MoveOutcome)
//! in the result.  Neither aborts the caller.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A requested target height lies outside the configured physical range.
    /// Rejected before any relay is touched.
    InvalidTarget {
        target_cm: u16,
        min_cm: u16,
        max_cm: u16,
    },
    /// Configuration is missing, unparseable, or fails range validation.
    /// Fatal: the service must not be constructed from it.
    Config(ConfigError),
    /// Peripheral initialisation failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTarget {
                target_cm,
                min_cm,
                max_cm,
            } => write!(
                f,
                "target {target_cm} cm outside physical range {min_cm}..={max_cm} cm"
            ),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors raised while loading or validating [`DeskConfig`](crate::config::DeskConfig).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment override exists but does not parse as a number.
    /// The `&'static str` names the variable.
    EnvParse(&'static str),
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnvParse(var) => write!(f, "environment variable {var} is not a valid number"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
