//! Inference port adapter over the Ollama engine

use ai_core::{InferenceConfig, InferenceError, OllamaEngine};
use application::ApplicationError;
use application::ports::{InferencePort, InferenceResult};
use async_trait::async_trait;

use crate::retry::{RetryConfig, retry};

/// [`InferencePort`] implementation backed by [`OllamaEngine`]
#[derive(Debug)]
pub struct OllamaInferenceAdapter {
    engine: OllamaEngine,
    retry: RetryConfig,
}

impl OllamaInferenceAdapter {
    /// Create the adapter
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: InferenceConfig, retry: RetryConfig) -> Result<Self, InferenceError> {
        Ok(Self {
            engine: OllamaEngine::new(config)?,
            retry,
        })
    }
}

#[async_trait]
impl InferencePort for OllamaInferenceAdapter {
    async fn generate_with_system(
        &self,
        system_prompt: &str,
        message: &str,
    ) -> Result<InferenceResult, ApplicationError> {
        let completion = retry(&self.retry, || self.engine.chat(system_prompt, message))
            .await
            .map_err(|e| ApplicationError::Inference(e.to_string()))?;

        Ok(InferenceResult {
            content: completion.content,
            model: completion.model,
            tokens_used: completion.tokens_used,
            latency_ms: completion.latency_ms,
        })
    }

    async fn is_healthy(&self) -> bool {
        self.engine.health_check().await
    }

    fn current_model(&self) -> String {
        self.engine.model().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adapter_creation_and_model() {
        let adapter = OllamaInferenceAdapter::new(
            InferenceConfig {
                model: "llama3.2-1b-instruct".to_string(),
                ..InferenceConfig::default()
            },
            RetryConfig::default(),
        )
        .expect("adapter");
        assert_eq!(adapter.current_model(), "llama3.2-1b-instruct");
    }
}
