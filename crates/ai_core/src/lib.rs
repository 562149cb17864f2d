//! LLM inference client for Nimbus
//!
//! Talks to an Ollama-compatible chat endpoint. The application layer
//! sees this through its inference port; the infrastructure adapter
//! handles retries and error widening.

pub mod config;
pub mod error;
pub mod ollama;

pub use config::InferenceConfig;
pub use error::InferenceError;
pub use ollama::{ChatCompletion, OllamaEngine};
