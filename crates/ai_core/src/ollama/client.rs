//! Ollama chat client implementation

use std::time::{Duration, Instant};

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::config::InferenceConfig;
use crate::error::InferenceError;

/// Completed chat response
#[derive(Debug, Clone)]
pub struct ChatCompletion {
    /// Generated content
    pub content: String,
    /// Model that produced it
    pub model: String,
    /// Total tokens used, when the server reports counts
    pub tokens_used: Option<u32>,
    /// Wall-clock latency in milliseconds
    pub latency_ms: u64,
}

/// Inference engine backed by an Ollama-compatible server
#[derive(Debug)]
pub struct OllamaEngine {
    client: Client,
    config: InferenceConfig,
}

impl OllamaEngine {
    /// Create a new engine with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: InferenceConfig) -> Result<Self, InferenceError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| InferenceError::ConnectionFailed(e.to_string()))?;

        info!(
            base_url = %config.base_url,
            model = %config.model,
            "Initialized inference engine"
        );

        Ok(Self { client, config })
    }

    /// Create with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn with_defaults() -> Result<Self, InferenceError> {
        Self::new(InferenceConfig::default())
    }

    /// The configured model name
    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Build the API URL for a given endpoint
    fn api_url(&self, endpoint: &str) -> String {
        format!(
            "{}/api/{}",
            self.config.base_url,
            endpoint.trim_start_matches('/')
        )
    }

    /// Run one chat turn with a system prompt
    #[instrument(skip_all, fields(model = %self.config.model, message_len = message.len()))]
    pub async fn chat(
        &self,
        system_prompt: &str,
        message: &str,
    ) -> Result<ChatCompletion, InferenceError> {
        let request = OllamaChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                OllamaMessage {
                    role: "system".to_string(),
                    content: system_prompt.to_string(),
                },
                OllamaMessage {
                    role: "user".to_string(),
                    content: message.to_string(),
                },
            ],
            stream: false,
            options: OllamaOptions {
                temperature: self.config.temperature,
                num_predict: self.config.max_tokens,
            },
        };

        debug!("Sending chat request");
        let started = Instant::now();

        let response = self
            .client
            .post(self.api_url("chat"))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(InferenceError::RateLimited);
        }
        if status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Inference request failed");
            return Err(InferenceError::ServerError(format!("HTTP {status}: {body}")));
        }
        if !status.is_success() {
            return Err(InferenceError::RequestFailed(format!("HTTP {status}")));
        }

        let chat_response: OllamaChatResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::InvalidResponse(e.to_string()))?;

        let tokens_used = match (
            chat_response.prompt_eval_count,
            chat_response.eval_count,
        ) {
            (Some(prompt), Some(completion)) => Some(prompt + completion),
            _ => None,
        };

        #[allow(clippy::cast_possible_truncation)]
        let latency_ms = started.elapsed().as_millis() as u64;
        debug!(tokens = ?tokens_used, latency_ms, "Chat completed");

        Ok(ChatCompletion {
            content: chat_response.message.content,
            model: chat_response.model,
            tokens_used,
            latency_ms,
        })
    }

    /// Check whether the server responds on the models endpoint
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> bool {
        let response = self
            .client
            .get(format!("{}/api/tags", self.config.base_url))
            .timeout(Duration::from_secs(5))
            .send()
            .await;

        matches!(response, Ok(resp) if resp.status().is_success())
    }
}

/// Ollama-format chat request
#[derive(Debug, Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

/// Ollama-format chat response
#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    model: String,
    message: OllamaResponseMessage,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OllamaResponseMessage {
    content: String,
}
