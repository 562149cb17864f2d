//! Application layer for Nimbus
//!
//! Orchestrates the query pipeline over abstract ports: intent parsing
//! (LLM primary, deterministic fallback), IP geolocation, weather
//! fetching with comparison fan-out, and summary generation.

pub mod error;
pub mod intent_parser;
pub mod ports;
pub mod services;

pub use error::{ApplicationError, ProviderErrorKind};
pub use intent_parser::IntentParser;
pub use services::{LocationPolicy, QueryResponse, QueryService, SummaryService};
