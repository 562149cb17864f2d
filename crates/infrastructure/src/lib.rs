//! Infrastructure layer for Nimbus
//!
//! Owns the application configuration, the generic retry combinator,
//! and the adapters that implement the application ports over the
//! integration crates.

pub mod adapters;
pub mod config;
pub mod retry;

pub use adapters::{IpApiGeoIpAdapter, OllamaInferenceAdapter, OpenWeatherAdapter};
pub use config::{AppConfig, DefaultsConfig, ServerConfig};
pub use retry::{RetryConfig, Retryable, retry};
