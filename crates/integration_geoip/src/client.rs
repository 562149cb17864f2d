//! IP geolocation HTTP client

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

/// Geolocation client errors
#[derive(Debug, Error)]
pub enum GeoIpError {
    /// Rate limit exceeded (HTTP 429)
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Timeout talking to the service
    #[error("Request timed out after {0}ms")]
    Timeout(u64),

    /// Connection failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request failed for another reason
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Service is temporarily unavailable (5xx)
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Provider answered, but with an unusable payload
    ///
    /// Covers a "fail" status as well as responses missing the city,
    /// country, or coordinates; a partial location is never returned.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl GeoIpError {
    /// Whether retrying could plausibly succeed
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

impl From<reqwest::Error> for GeoIpError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(5_000)
        } else if err.is_connect() {
            Self::ConnectionFailed(err.to_string())
        } else {
            Self::RequestFailed(err.to_string())
        }
    }
}

/// Geolocation service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoIpConfig {
    /// Service base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Connection timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://ip-api.com".to_string()
}

const fn default_timeout() -> u64 {
    5
}

impl Default for GeoIpConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

/// A resolved location, complete by construction
#[derive(Debug, Clone, PartialEq)]
pub struct IpLocation {
    pub city: String,
    pub country: String,
    pub region: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
}

/// Raw service response
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default, rename = "regionName")]
    region_name: Option<String>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
    #[serde(default)]
    timezone: Option<String>,
}

/// IP geolocation HTTP client
#[derive(Debug)]
pub struct GeoIpClient {
    client: Client,
    config: GeoIpConfig,
}

impl GeoIpClient {
    /// Create a new client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: GeoIpConfig) -> Result<Self, GeoIpError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GeoIpError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Resolve the current public IP to a location
    #[instrument(skip(self))]
    pub async fn lookup(&self) -> Result<IpLocation, GeoIpError> {
        debug!("Resolving location via IP");

        let response = self
            .client
            .get(format!("{}/json", self.config.base_url))
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(GeoIpError::RateLimited);
        }
        if status.is_server_error() {
            return Err(GeoIpError::ServiceUnavailable(format!("HTTP {status}")));
        }
        if !status.is_success() {
            return Err(GeoIpError::RequestFailed(format!("HTTP {status}")));
        }

        let wire: IpApiResponse = response
            .json()
            .await
            .map_err(|e| GeoIpError::InvalidResponse(e.to_string()))?;

        Self::validate(wire)
    }

    /// Reject fail statuses and incomplete payloads
    fn validate(wire: IpApiResponse) -> Result<IpLocation, GeoIpError> {
        if wire.status != "success" {
            return Err(GeoIpError::InvalidResponse(format!(
                "lookup failed: {}",
                wire.message.unwrap_or_else(|| "unknown reason".to_string())
            )));
        }

        let mut missing = Vec::new();
        if wire.city.as_deref().is_none_or(str::is_empty) {
            missing.push("city");
        }
        if wire.country.as_deref().is_none_or(str::is_empty) {
            missing.push("country");
        }
        if wire.lat.is_none() {
            missing.push("lat");
        }
        if wire.lon.is_none() {
            missing.push("lon");
        }
        if !missing.is_empty() {
            return Err(GeoIpError::InvalidResponse(format!(
                "missing fields: {}",
                missing.join(", ")
            )));
        }

        // Checked above
        let (Some(city), Some(country), Some(lat), Some(lon)) =
            (wire.city, wire.country, wire.lat, wire.lon)
        else {
            return Err(GeoIpError::InvalidResponse("missing fields".to_string()));
        };

        Ok(IpLocation {
            city,
            country,
            region: wire.region_name.unwrap_or_default(),
            latitude: lat,
            longitude: lon,
            timezone: wire.timezone.unwrap_or_default(),
        })
    }
}
