//! Weather service port
//!
//! Defines the interface for weather data retrieval. Implementations
//! normalize the provider payload into a [`WeatherReport`] with the
//! requested unit system already applied.

use async_trait::async_trait;
use domain::{UnitSystem, WeatherReport};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for weather provider operations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WeatherPort: Send + Sync {
    /// Get current conditions for a city
    async fn current_weather(
        &self,
        city: &str,
        units: UnitSystem,
    ) -> Result<WeatherReport, ApplicationError>;

    /// Get a daily forecast for a city
    ///
    /// # Arguments
    /// * `city` - City name as typed by the user
    /// * `days` - Number of forecast days (1-5 for 3-hour-sample providers)
    /// * `units` - Unit system to request from the provider
    async fn forecast(
        &self,
        city: &str,
        days: u8,
        units: UnitSystem,
    ) -> Result<WeatherReport, ApplicationError>;

    /// Check if the weather provider is reachable
    async fn is_available(&self) -> bool;
}
