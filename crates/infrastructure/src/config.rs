//! Application configuration
//!
//! One explicit struct, built once at process start and passed into
//! every component constructor. Values layer as: serde defaults, then
//! an optional `nimbus.toml`, then `NIMBUS_*` environment variables.

use ai_core::InferenceConfig;
use domain::UnitSystem;
use integration_geoip::GeoIpConfig;
use integration_weather::WeatherConfig;
use serde::{Deserialize, Serialize};

use crate::retry::RetryConfig;

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind host
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins (empty = allow any, development mode)
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origins: Vec::new(),
        }
    }
}

/// Cross-surface defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Unit system used when a query does not specify one
    ///
    /// Both the CLI and the HTTP API read this field, so the surfaces
    /// cannot disagree about the default.
    #[serde(default)]
    pub units: UnitSystem,

    /// City substituted by the HTTP surface when geolocation fails
    #[serde(default = "default_city")]
    pub city: String,
}

fn default_city() -> String {
    "London".to_string()
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            units: UnitSystem::default(),
            city: default_city(),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Inference backend settings
    #[serde(default)]
    pub inference: InferenceConfig,

    /// Weather provider settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Geolocation service settings
    #[serde(default)]
    pub geoip: GeoIpConfig,

    /// Retry policy shared by all outbound calls
    #[serde(default)]
    pub retry: RetryConfig,

    /// Cross-surface defaults
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

impl AppConfig {
    /// Load configuration from `nimbus.toml` and `NIMBUS_*` env vars
    ///
    /// # Errors
    ///
    /// Returns an error when a source fails to parse or deserialize.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("nimbus").required(false))
            .add_source(
                config::Environment::with_prefix("NIMBUS")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Check startup invariants
    ///
    /// # Errors
    ///
    /// Returns an error when the weather API key is missing or the
    /// server port is zero.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.weather.api_key.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "weather.api_key must be set (NIMBUS__WEATHER__API_KEY)".to_string(),
            ));
        }
        if self.server.port == 0 {
            return Err(config::ConfigError::Message(
                "server.port must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.defaults.units, UnitSystem::Metric);
        assert_eq!(config.defaults.city, "London");
        assert_eq!(config.retry.max_attempts, 3);
    }

    #[test]
    fn validate_rejects_missing_api_key() {
        let config = AppConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_port() {
        let mut config = AppConfig::default();
        config.weather.api_key = "key".to_string();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_accepts_complete_config() {
        let mut config = AppConfig::default();
        config.weather.api_key = "key".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn deserializes_from_toml_fragment() {
        let toml = r#"
            [server]
            port = 8080

            [weather]
            api_key = "secret"

            [defaults]
            units = "imperial"
            city = "Boston"
        "#;
        let config: AppConfig = toml::from_str(toml).expect("parse");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.weather.api_key, "secret");
        assert_eq!(config.defaults.units, UnitSystem::Imperial);
        assert_eq!(config.defaults.city, "Boston");
    }
}
