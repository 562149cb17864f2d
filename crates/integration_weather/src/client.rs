//! OpenWeather HTTP client
//!
//! Queries the provider directly in the caller's unit system via the
//! `units` request parameter; no client-side temperature math happens
//! here.

use std::time::Duration;

use chrono::{DateTime, Utc};
use domain::{CurrentConditions, UnitSystem, WeatherReport};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::aggregate::aggregate_daily;
use crate::models::{CurrentResponse, ForecastResponse};

/// Weather client errors
#[derive(Debug, Error)]
pub enum WeatherError {
    /// API key rejected (HTTP 401)
    #[error("Invalid API credentials")]
    InvalidCredentials,

    /// City unknown to the provider (HTTP 404)
    #[error("Location not found: {0}")]
    LocationNotFound(String),

    /// Rate limit exceeded (HTTP 429)
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Timeout talking to the provider
    #[error("Request timed out after {0}ms")]
    Timeout(u64),

    /// Connection to the provider failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request failed for another reason
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Provider is temporarily unavailable (5xx)
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Failed to parse the provider response
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Provider returned zero condition entries
    #[error("Provider returned no weather conditions")]
    EmptyConditions,
}

impl WeatherError {
    /// Whether retrying could plausibly succeed
    ///
    /// Credential and not-found errors are permanent; retrying cannot
    /// fix them. Malformed payloads are answered, just answered badly.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RateLimited
                | Self::Timeout(_)
                | Self::ConnectionFailed(_)
                | Self::ServiceUnavailable(_)
        )
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(10_000)
        } else if err.is_connect() {
            Self::ConnectionFailed(err.to_string())
        } else {
            Self::RequestFailed(err.to_string())
        }
    }
}

/// Weather service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Provider base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key (required; validated at startup)
    #[serde(default)]
    pub api_key: String,

    /// Connection timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

const fn default_timeout() -> u64 {
    10
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            timeout_secs: default_timeout(),
        }
    }
}

/// OpenWeather HTTP client
#[derive(Debug)]
pub struct OpenWeatherClient {
    client: Client,
    config: WeatherConfig,
}

impl OpenWeatherClient {
    /// Create a new client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: WeatherConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WeatherError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Get current conditions for a city
    #[instrument(skip(self), fields(units = %units))]
    pub async fn current(
        &self,
        city: &str,
        units: UnitSystem,
    ) -> Result<WeatherReport, WeatherError> {
        debug!("Fetching current weather");

        let response = self
            .client
            .get(format!("{}/weather", self.config.base_url))
            .query(&[
                ("q", city),
                ("units", units.as_str()),
                ("appid", &self.config.api_key),
            ])
            .send()
            .await?;
        let response = Self::check_status(response, city)?;

        let wire: CurrentResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::ParseError(e.to_string()))?;

        let entry = wire.weather.first().ok_or(WeatherError::EmptyConditions)?;

        let observed_at = DateTime::from_timestamp(wire.dt, 0).unwrap_or_else(Utc::now);

        Ok(WeatherReport {
            city: wire.name.clone(),
            country: wire.sys.country.clone().unwrap_or_default(),
            units,
            current: Some(CurrentConditions {
                temperature: wire.main.temp,
                feels_like: wire.main.feels_like,
                humidity: wire.main.humidity,
                pressure: wire.main.pressure,
                visibility: wire.visibility.unwrap_or_default(),
                wind_speed: wire.wind.speed,
                wind_direction_deg: wire.wind.deg.unwrap_or(0) % 360,
                description: entry.description.clone(),
                icon: entry.icon.clone(),
                condition: entry.main.clone(),
                observed_at,
            }),
            forecast: vec![],
        })
    }

    /// Get a daily forecast for a city
    ///
    /// The provider answers with 3-hour samples; `min(days × 8, 40)` of
    /// them are requested and aggregated into calendar days.
    #[instrument(skip(self), fields(units = %units))]
    pub async fn forecast(
        &self,
        city: &str,
        days: u8,
        units: UnitSystem,
    ) -> Result<WeatherReport, WeatherError> {
        let samples = (u32::from(days) * 8).min(40);
        debug!(samples, "Fetching forecast");

        let response = self
            .client
            .get(format!("{}/forecast", self.config.base_url))
            .query(&[
                ("q", city),
                ("units", units.as_str()),
                ("cnt", &samples.to_string()),
                ("appid", &self.config.api_key),
            ])
            .send()
            .await?;
        let response = Self::check_status(response, city)?;

        let wire: ForecastResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::ParseError(e.to_string()))?;

        let daily = aggregate_daily(&wire.list, usize::from(days));

        Ok(WeatherReport {
            city: wire.city.name,
            country: wire.city.country,
            units,
            current: None,
            forecast: daily,
        })
    }

    /// Lightweight availability probe
    pub async fn is_available(&self) -> bool {
        self.current("London", UnitSystem::Metric).await.is_ok()
    }

    /// Map response status codes onto the error taxonomy
    fn check_status(
        response: reqwest::Response,
        city: &str,
    ) -> Result<reqwest::Response, WeatherError> {
        let status = response.status();
        match status {
            reqwest::StatusCode::UNAUTHORIZED => Err(WeatherError::InvalidCredentials),
            reqwest::StatusCode::NOT_FOUND => {
                Err(WeatherError::LocationNotFound(city.to_string()))
            },
            reqwest::StatusCode::TOO_MANY_REQUESTS => Err(WeatherError::RateLimited),
            _ if status.is_server_error() => {
                Err(WeatherError::ServiceUnavailable(format!("HTTP {status}")))
            },
            _ if !status.is_success() => {
                Err(WeatherError::RequestFailed(format!("HTTP {status}")))
            },
            _ => Ok(response),
        }
    }
}
