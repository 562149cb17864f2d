//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Sub-kind of a weather-provider failure
///
/// The HTTP layer maps these onto response status codes, so the kind has
/// to survive the trip from the integration crate to the handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// API key rejected (HTTP 401)
    InvalidCredentials,
    /// City unknown to the provider (HTTP 404)
    LocationNotFound,
    /// Provider rate limit hit (HTTP 429)
    RateLimited,
    /// Request timed out after retries
    Timeout,
    /// Anything else: 5xx, malformed payloads, connection failures
    Unknown,
}

impl ProviderErrorKind {
    /// Stable snake_case name, used in API error codes
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "invalid_credentials",
            Self::LocationNotFound => "location_not_found",
            Self::RateLimited => "rate_limited",
            Self::Timeout => "timeout",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Inference/AI backend error
    #[error("Inference error: {0}")]
    Inference(String),

    /// Intent parsing failed (model error or schema violation)
    #[error("Intent parse error: {0}")]
    Parse(String),

    /// IP geolocation failed
    #[error("Geolocation error: {0}")]
    GeoIp(String),

    /// Weather provider failure with its sub-kind
    #[error("Weather provider error ({kind}): {message}")]
    Provider {
        kind: ProviderErrorKind,
        message: String,
    },

    /// Summary generation failed
    #[error("Summary error: {0}")]
    Summary(String),

    /// Malformed caller input
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Shorthand constructor for provider errors
    pub fn provider(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self::Provider {
            kind,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_kind_names() {
        assert_eq!(
            ProviderErrorKind::InvalidCredentials.as_str(),
            "invalid_credentials"
        );
        assert_eq!(
            ProviderErrorKind::LocationNotFound.as_str(),
            "location_not_found"
        );
        assert_eq!(ProviderErrorKind::RateLimited.as_str(), "rate_limited");
        assert_eq!(ProviderErrorKind::Timeout.as_str(), "timeout");
        assert_eq!(ProviderErrorKind::Unknown.as_str(), "unknown");
    }

    #[test]
    fn provider_error_message_includes_kind() {
        let err = ApplicationError::provider(ProviderErrorKind::LocationNotFound, "no such city");
        assert_eq!(
            err.to_string(),
            "Weather provider error (location_not_found): no such city"
        );
    }

    #[test]
    fn domain_error_is_transparent() {
        let err: ApplicationError =
            DomainError::ValidationError("bad field".to_string()).into();
        assert_eq!(err.to_string(), "Validation failed: bad field");
    }

    #[test]
    fn geoip_error_message() {
        let err = ApplicationError::GeoIp("lookup timed out".to_string());
        assert_eq!(err.to_string(), "Geolocation error: lookup timed out");
    }
}
