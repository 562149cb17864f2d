//! Ollama-compatible chat client

mod client;

pub use client::{ChatCompletion, OllamaEngine};
