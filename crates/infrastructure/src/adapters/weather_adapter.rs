//! Weather port adapter over the OpenWeather client

use application::ports::WeatherPort;
use application::{ApplicationError, ProviderErrorKind};
use async_trait::async_trait;
use domain::{UnitSystem, WeatherReport};
use integration_weather::{OpenWeatherClient, WeatherConfig, WeatherError};

use crate::retry::{RetryConfig, retry};

/// [`WeatherPort`] implementation backed by [`OpenWeatherClient`]
#[derive(Debug)]
pub struct OpenWeatherAdapter {
    client: OpenWeatherClient,
    retry: RetryConfig,
}

impl OpenWeatherAdapter {
    /// Create the adapter
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: WeatherConfig, retry: RetryConfig) -> Result<Self, WeatherError> {
        Ok(Self {
            client: OpenWeatherClient::new(config)?,
            retry,
        })
    }
}

/// Widen a client error into the application taxonomy, keeping the kind
fn widen(error: &WeatherError) -> ApplicationError {
    let kind = match error {
        WeatherError::InvalidCredentials => ProviderErrorKind::InvalidCredentials,
        WeatherError::LocationNotFound(_) => ProviderErrorKind::LocationNotFound,
        WeatherError::RateLimited => ProviderErrorKind::RateLimited,
        WeatherError::Timeout(_) => ProviderErrorKind::Timeout,
        WeatherError::ConnectionFailed(_)
        | WeatherError::RequestFailed(_)
        | WeatherError::ServiceUnavailable(_)
        | WeatherError::ParseError(_)
        | WeatherError::EmptyConditions => ProviderErrorKind::Unknown,
    };
    ApplicationError::provider(kind, error.to_string())
}

#[async_trait]
impl WeatherPort for OpenWeatherAdapter {
    async fn current_weather(
        &self,
        city: &str,
        units: UnitSystem,
    ) -> Result<WeatherReport, ApplicationError> {
        retry(&self.retry, || self.client.current(city, units))
            .await
            .map_err(|e| widen(&e))
    }

    async fn forecast(
        &self,
        city: &str,
        days: u8,
        units: UnitSystem,
    ) -> Result<WeatherReport, ApplicationError> {
        retry(&self.retry, || self.client.forecast(city, days, units))
            .await
            .map_err(|e| widen(&e))
    }

    async fn is_available(&self) -> bool {
        self.client.is_available().await
    }
}
