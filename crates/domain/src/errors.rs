//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),

    /// Intent is structurally invalid
    #[error("Invalid intent: {0}")]
    InvalidIntent(String),

    /// Date/time parsing error
    #[error("Invalid date/time: {0}")]
    InvalidDateTime(String),
}
