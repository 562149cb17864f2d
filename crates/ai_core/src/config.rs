//! Configuration for the inference engine

use serde::{Deserialize, Serialize};

/// Configuration for the inference engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Base URL of the Ollama-compatible server
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model to use
    #[serde(default = "default_model")]
    pub model: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Temperature for sampling (low keeps JSON output stable)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "qwen2.5-1.5b-instruct".to_string()
}

const fn default_timeout_ms() -> u64 {
    30_000
}

const fn default_max_tokens() -> u32 {
    512
}

const fn default_temperature() -> f32 {
    0.2
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            timeout_ms: default_timeout_ms(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}
