//! Generic retry with exponential backoff
//!
//! One combinator for every outbound call: model, weather provider,
//! geolocation. Only errors that declare themselves transient are
//! retried; everything else short-circuits on the first attempt.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Configuration for retry behavior
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts, including the first (default: 3)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry in milliseconds (default: 200)
    #[serde(default = "default_base_delay")]
    pub base_delay_ms: u64,

    /// Cap on any single delay in milliseconds (default: 5000)
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,

    /// Add up to ±10% jitter to each delay (default: true)
    #[serde(default = "default_jitter")]
    pub jitter: bool,
}

const fn default_max_attempts() -> u32 {
    3
}

const fn default_base_delay() -> u64 {
    200
}

const fn default_max_delay() -> u64 {
    5_000
}

const fn default_jitter() -> bool {
    true
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay(),
            max_delay_ms: default_max_delay(),
            jitter: default_jitter(),
        }
    }
}

impl RetryConfig {
    /// Disable jitter, for deterministic tests
    #[must_use]
    pub const fn without_jitter(mut self) -> Self {
        self.jitter = false;
        self
    }

    /// Delay before retry number `retry` (0-indexed): base × 2^retry,
    /// capped, with optional jitter
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap
    )]
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponential = (self.base_delay_ms as f64) * 2.0_f64.powi(retry.min(16) as i32);
        let capped = exponential.min(self.max_delay_ms as f64);

        let with_jitter = if self.jitter {
            let spread = capped * 0.1;
            capped + rand::rng().random_range(-spread..=spread)
        } else {
            capped
        };

        Duration::from_millis(with_jitter.max(0.0) as u64)
    }
}

/// Errors that know whether retrying makes sense
pub trait Retryable {
    /// Returns true if this error is worth retrying
    fn is_retryable(&self) -> bool;
}

impl Retryable for ai_core::InferenceError {
    fn is_retryable(&self) -> bool {
        self.is_transient()
    }
}

impl Retryable for integration_weather::WeatherError {
    fn is_retryable(&self) -> bool {
        self.is_transient()
    }
}

impl Retryable for integration_geoip::GeoIpError {
    fn is_retryable(&self) -> bool {
        self.is_transient()
    }
}

/// Run `operation` up to `config.max_attempts` times
///
/// Non-retryable errors and exhausted attempts return the last error.
pub async fn retry<F, Fut, T, E>(config: &RetryConfig, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + std::fmt::Display,
{
    let attempts = config.max_attempts.max(1);

    for attempt in 0..attempts {
        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    debug!(attempt = attempt + 1, "Operation succeeded after retries");
                }
                return Ok(value);
            },
            Err(err) if !err.is_retryable() => {
                debug!(error = %err, "Non-retryable error, giving up");
                return Err(err);
            },
            Err(err) if attempt + 1 == attempts => {
                warn!(attempts, error = %err, "Retries exhausted");
                return Err(err);
            },
            Err(err) => {
                let delay = config.delay_for(attempt);
                warn!(
                    attempt = attempt + 1,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "Operation failed, retrying"
                );
                tokio::time::sleep(delay).await;
            },
        }
    }

    // The loop always returns within max_attempts iterations
    unreachable!("retry loop exited without a result")
}
