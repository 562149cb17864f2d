//! LLM-powered intent extraction.

use std::sync::Arc;

use domain::{Intent, UnitSystem};
use tracing::{debug, instrument};

use super::{INTENT_SYSTEM_PROMPT, IntentParser, RawIntent};
use crate::{error::ApplicationError, ports::InferencePort};

impl IntentParser {
    /// Parse a query with the language model
    ///
    /// Transport failures bubble up from the inference port (which owns
    /// the retry policy). A response that arrives but fails JSON or
    /// schema validation is a hard parse error and is never retried;
    /// callers switch to [`IntentParser::parse_fallback`] instead.
    #[instrument(skip(self, inference, query), fields(query_len = query.len()))]
    pub async fn parse(
        &self,
        inference: &Arc<dyn InferencePort>,
        query: &str,
        default_units: UnitSystem,
    ) -> Result<Intent, ApplicationError> {
        let result = inference
            .generate_with_system(INTENT_SYSTEM_PROMPT, query)
            .await?;

        debug!(model = %result.model, latency_ms = result.latency_ms, "Intent response received");

        self.parse_response(&result.content, default_units)
            .map_err(ApplicationError::Parse)
    }

    /// Parse a raw model response into an [`Intent`]
    pub(crate) fn parse_response(
        &self,
        response: &str,
        default_units: UnitSystem,
    ) -> Result<Intent, String> {
        let json = Self::extract_json(response)
            .ok_or_else(|| "no JSON object in model output".to_string())?;

        let raw: RawIntent =
            serde_json::from_str(json).map_err(|e| format!("JSON parse error: {e}"))?;

        Self::intent_from_raw(raw, default_units)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use domain::DateKind;

    use super::*;
    use crate::ports::{InferenceResult, MockInferencePort};

    fn inference_returning(content: &'static str) -> Arc<dyn InferencePort> {
        let mut mock = MockInferencePort::new();
        mock.expect_generate_with_system().returning(move |_, _| {
            Ok(InferenceResult {
                content: content.to_string(),
                model: "test".to_string(),
                tokens_used: Some(20),
                latency_ms: 10,
            })
        });
        Arc::new(mock)
    }

    #[tokio::test]
    async fn parse_valid_model_output() {
        let inference = inference_returning(
            r#"{"cities":["Tokyo"],"date":{"kind":"range","days":5},"compare":false}"#,
        );
        let parser = IntentParser::new();

        let intent = parser
            .parse(&inference, "5 day forecast for Tokyo", UnitSystem::Metric)
            .await
            .expect("valid intent");

        assert_eq!(intent.cities, vec!["Tokyo"]);
        assert_eq!(intent.date.kind, DateKind::Range);
        assert_eq!(intent.date.days, Some(5));
    }

    #[tokio::test]
    async fn parse_output_wrapped_in_prose() {
        let inference = inference_returning(
            r#"The intent is: {"cities":["Oslo"],"date":{"kind":"today"}} — done."#,
        );
        let parser = IntentParser::new();

        let intent = parser
            .parse(&inference, "weather in Oslo", UnitSystem::Metric)
            .await
            .expect("valid intent");
        assert_eq!(intent.cities, vec!["Oslo"]);
    }

    #[tokio::test]
    async fn parse_malformed_output_is_parse_error() {
        let inference = inference_returning("I could not understand that query.");
        let parser = IntentParser::new();

        let result = parser
            .parse(&inference, "weather in Oslo", UnitSystem::Metric)
            .await;
        assert!(matches!(result, Err(ApplicationError::Parse(_))));
    }

    #[tokio::test]
    async fn parse_schema_violation_is_parse_error() {
        let inference =
            inference_returning(r#"{"cities":[],"date":{"kind":"today"},"compare":false}"#);
        let parser = IntentParser::new();

        let result = parser
            .parse(&inference, "weather", UnitSystem::Metric)
            .await;
        let Err(ApplicationError::Parse(message)) = result else {
            unreachable!("expected parse error");
        };
        assert!(message.contains("cities"));
    }

    #[tokio::test]
    async fn parse_propagates_inference_failure() {
        let mut mock = MockInferencePort::new();
        mock.expect_generate_with_system()
            .returning(|_, _| Err(ApplicationError::Internal("model down".to_string())));
        let inference: Arc<dyn InferencePort> = Arc::new(mock);
        let parser = IntentParser::new();

        let result = parser
            .parse(&inference, "weather in Oslo", UnitSystem::Metric)
            .await;
        assert!(matches!(result, Err(ApplicationError::Internal(_))));
    }

    #[test]
    fn parse_response_applies_default_units() {
        let parser = IntentParser::new();
        let intent = parser
            .parse_response(
                r#"{"cities":["Rome"],"date":{"kind":"today"}}"#,
                UnitSystem::Imperial,
            )
            .expect("valid");
        assert_eq!(intent.units, UnitSystem::Imperial);
    }

    #[test]
    fn parse_response_honors_explicit_units() {
        let parser = IntentParser::new();
        let intent = parser
            .parse_response(
                r#"{"cities":["Rome"],"units":"metric"}"#,
                UnitSystem::Imperial,
            )
            .expect("valid");
        assert_eq!(intent.units, UnitSystem::Metric);
    }
}
