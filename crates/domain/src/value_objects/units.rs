//! Unit system and measurement conversions
//!
//! The unit system is fixed once when a weather report is normalized;
//! everything downstream reads the tag instead of re-interpreting numbers.
//! Conversions live here exactly once so the two presentation surfaces
//! can never drift apart.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Measurement system for temperatures and wind speeds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitSystem {
    /// Celsius, metres per second
    #[default]
    Metric,
    /// Fahrenheit, miles per hour
    Imperial,
}

impl UnitSystem {
    /// Display label for temperatures in this system
    #[must_use]
    pub const fn temperature_label(&self) -> &'static str {
        match self {
            Self::Metric => "°C",
            Self::Imperial => "°F",
        }
    }

    /// Display label for wind speeds in this system
    #[must_use]
    pub const fn speed_label(&self) -> &'static str {
        match self {
            Self::Metric => "m/s",
            Self::Imperial => "mph",
        }
    }

    /// Canonical lowercase name, as used in API requests
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UnitSystem {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "metric" | "celsius" => Ok(Self::Metric),
            "imperial" | "fahrenheit" => Ok(Self::Imperial),
            other => Err(DomainError::ValidationError(format!(
                "unknown unit system: {other}"
            ))),
        }
    }
}

/// Convert Celsius to Fahrenheit: `F = C × 9⁄5 + 32`
#[must_use]
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Convert Fahrenheit to Celsius: `C = (F − 32) × 5⁄9`
#[must_use]
pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

/// Convert metres per second to miles per hour
#[must_use]
pub fn ms_to_mph(ms: f64) -> f64 {
    ms * 2.237
}

/// Convert metres per second to kilometres per hour
#[must_use]
pub fn ms_to_kmh(ms: f64) -> f64 {
    ms * 3.6
}

/// Convert miles per hour to kilometres per hour
#[must_use]
pub fn mph_to_kmh(mph: f64) -> f64 {
    mph * 1.609
}

/// The 16 compass points, clockwise from north
pub const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Bucket a wind direction into one of 16 compass sectors (22.5° each)
///
/// Directions outside [0, 360) are normalized first, so 360° maps to north.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn compass_index(degrees: f64) -> usize {
    let normalized = degrees.rem_euclid(360.0);
    ((normalized / 22.5).round() as usize) % 16
}

/// Human-readable compass point for a wind direction
#[must_use]
pub fn compass_point(degrees: f64) -> &'static str {
    COMPASS_POINTS[compass_index(degrees)]
}
