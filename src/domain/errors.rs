// Domain-level errors for simulation setup and ticking.

use std::fmt;

/// Invalid tuning or spawn parameters, rejected at construction time.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Value must be finite and strictly greater than zero.
    NonPositive { field: &'static str, value: f32 },
    /// Value must be finite and zero or greater.
    Negative { field: &'static str, value: f32 },
    /// NaN or infinite coordinate or angle.
    NonFinite { field: &'static str },
    /// World bounds with min > max on either axis.
    InvertedBounds,
    /// Collision shape name that is neither `circle` nor `box`.
    UnknownCollisionShape(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositive { field, value } => {
                write!(f, "{field} must be a finite value > 0, got {value}")
            }
            Self::Negative { field, value } => {
                write!(f, "{field} must be a finite value >= 0, got {value}")
            }
            Self::NonFinite { field } => write!(f, "{field} must be finite"),
            Self::InvertedBounds => write!(f, "world bounds min must not exceed max"),
            Self::UnknownCollisionShape(name) => {
                write!(f, "unknown collision shape: {name:?} (expected circle or box)")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// The time source produced a delta the simulation cannot integrate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClockFault {
    /// Time went backwards between two ticks.
    NonMonotonic { previous: f64, now: f64 },
    /// Zero elapsed time, or a NaN/infinite reading.
    NonPositiveDelta { delta: f64 },
}

impl fmt::Display for ClockFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonMonotonic { previous, now } => {
                write!(f, "time source went backwards: {previous}s -> {now}s")
            }
            Self::NonPositiveDelta { delta } => {
                write!(f, "time source produced a non-positive delta: {delta}s")
            }
        }
    }
}

impl std::error::Error for ClockFault {}

/// Fatal simulation errors surfaced to the driver.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    Config(ConfigError),
    Clock(ClockFault),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "configuration error: {e}"),
            Self::Clock(e) => write!(f, "clock fault: {e}"),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Clock(e) => Some(e),
        }
    }
}

impl From<ConfigError> for SimError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<ClockFault> for SimError {
    fn from(e: ClockFault) -> Self {
        Self::Clock(e)
    }
}

/// Rejects zero, negative, NaN and infinite values.
pub(crate) fn require_positive(field: &'static str, value: f32) -> Result<f32, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

/// Rejects negative, NaN and infinite values.
pub(crate) fn require_non_negative(field: &'static str, value: f32) -> Result<f32, ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::Negative { field, value })
    }
}
