//! AI-generated weather summary

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Short narrative attached to a weather answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherSummary {
    /// One short briefing paragraph (never empty)
    pub briefing: String,
    /// Actionable tips, possibly empty
    #[serde(default)]
    pub tips: Vec<String>,
}

impl WeatherSummary {
    /// Create a summary, rejecting blank briefings
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` if the briefing is empty
    /// or whitespace-only.
    pub fn new(briefing: String, tips: Vec<String>) -> Result<Self, DomainError> {
        if briefing.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "briefing must not be empty".to_string(),
            ));
        }
        Ok(Self { briefing, tips })
    }
}
