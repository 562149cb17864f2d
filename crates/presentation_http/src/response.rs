//! Shared API response envelope

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Envelope wrapping every API response
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request succeeded
    pub success: bool,
    /// Payload, present on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Stable error code, present on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Human-readable message, present on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Server time of the response
    pub timestamp: DateTime<Utc>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Successful envelope around `data`
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
            timestamp: Utc::now(),
        }
    }
}

impl ApiResponse<serde_json::Value> {
    /// Failure envelope with a stable code and a message
    pub fn failure(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(code.into()),
            message: Some(message.into()),
            timestamp: Utc::now(),
        }
    }
}
