//! API error handling
//!
//! Maps application errors onto response status codes and the shared
//! envelope. Stack traces and internal detail never reach the client.

use application::{ApplicationError, ProviderErrorKind};
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use validator::ValidationErrors;

use crate::response::ApiResponse;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Upstream failure: {0}")]
    BadGateway(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Build a bad-request error with an itemized field list
    pub fn from_validation(errors: &ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .iter()
            .map(|(field, errors)| {
                let detail = errors
                    .iter()
                    .filter_map(|e| e.message.as_ref())
                    .map(std::string::ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                if detail.is_empty() {
                    (*field).to_string()
                } else {
                    format!("{field}: {detail}")
                }
            })
            .collect();
        fields.sort();
        Self::BadRequest(format!("invalid fields: {}", fields.join("; ")))
    }
}

impl From<ApplicationError> for ApiError {
    fn from(error: ApplicationError) -> Self {
        match error {
            ApplicationError::Validation(message) => Self::BadRequest(message),
            ApplicationError::Provider { kind, message } => match kind {
                ProviderErrorKind::LocationNotFound => Self::NotFound(message),
                ProviderErrorKind::RateLimited => Self::RateLimited,
                ProviderErrorKind::Timeout => Self::ServiceUnavailable(message),
                ProviderErrorKind::InvalidCredentials | ProviderErrorKind::Unknown => {
                    Self::BadGateway(message)
                },
            },
            ApplicationError::GeoIp(message) => Self::BadGateway(message),
            ApplicationError::Domain(e) => Self::BadRequest(e.to_string()),
            ApplicationError::Inference(message)
            | ApplicationError::Parse(message)
            | ApplicationError::Summary(message)
            | ApplicationError::Internal(message) => Self::Internal(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, "bad_request", message),
            Self::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            Self::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "rate_limited",
                "Rate limit exceeded".to_string(),
            ),
            Self::BadGateway(message) => (StatusCode::BAD_GATEWAY, "upstream_error", message),
            Self::ServiceUnavailable(message) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                message,
            ),
            Self::Internal(_) => (
                // Internal detail stays in the logs
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "An internal error occurred".to_string(),
            ),
        };

        (status, Json(ApiResponse::failure(code, message))).into_response()
    }
}
