//! Weather summary generation
//!
//! Second model call of the pipeline: turns a normalized weather report
//! into a short briefing with optional tips. Degrades to a deterministic
//! template when the model is unavailable or returns something unusable.

use std::sync::Arc;

use domain::value_objects::units::compass_point;
use domain::{WeatherReport, WeatherSummary};
use serde::Deserialize;
use tracing::{instrument, warn};

use crate::error::ApplicationError;
use crate::intent_parser::IntentParser;
use crate::ports::InferencePort;

/// System prompt for summary generation
pub(crate) const SUMMARY_SYSTEM_PROMPT: &str = r#"You are a weather briefing writer for a terminal assistant.
You receive structured weather data and produce a short, concrete briefing.

Reply ONLY with valid JSON:
{
  "briefing": "one or two sentences, under 60 words",
  "tips": ["short actionable tip", "..."]
}

Rules:
- Never invent numbers; only use values from the input.
- "tips" is optional and holds at most 3 entries.
- When the input lists topics under "user asked about", address them."#;

/// Summary payload as produced by the model
#[derive(Debug, Deserialize)]
struct RawSummary {
    briefing: String,
    #[serde(default)]
    tips: Option<Vec<String>>,
}

/// Service producing [`WeatherSummary`] values
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryService;

impl SummaryService {
    /// Create a new summary service
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Generate a summary for a report
    ///
    /// The model path is tried first; a failed call or an unusable
    /// response falls back to [`SummaryService::fallback`]. The only
    /// hard error is a report that carries no weather data at all.
    #[instrument(skip(self, inference, report, extras), fields(city = %report.city))]
    pub async fn generate(
        &self,
        inference: &Arc<dyn InferencePort>,
        report: &WeatherReport,
        extras: &[String],
    ) -> Result<WeatherSummary, ApplicationError> {
        let Some(payload) = Self::describe(report, extras) else {
            return Err(ApplicationError::Summary(
                "weather report carries no data to summarize".to_string(),
            ));
        };

        match inference
            .generate_with_system(SUMMARY_SYSTEM_PROMPT, &payload)
            .await
        {
            Ok(result) => match Self::parse_response(&result.content) {
                Ok(summary) => Ok(summary),
                Err(e) => {
                    warn!(error = %e, "Summary response failed validation, using fallback");
                    Ok(Self::fallback(report))
                },
            },
            Err(e) => {
                warn!(error = %e, "Summary model call failed, using fallback");
                Ok(Self::fallback(report))
            },
        }
    }

    /// Deterministic template summary (total for any report with data)
    #[must_use]
    pub fn fallback(report: &WeatherReport) -> WeatherSummary {
        let briefing = if let Some(current) = &report.current {
            format!(
                "Currently in {}: {}, {:.0}{} with wind at {:.1} {}.",
                report.city,
                current.description,
                current.temperature,
                report.units.temperature_label(),
                current.wind_speed,
                report.units.speed_label(),
            )
        } else if let Some(day) = report.forecast.first() {
            format!(
                "{} on {}: {}, between {:.0}{} and {:.0}{}.",
                report.city,
                day.date.format("%A"),
                day.description,
                day.temperature_min,
                report.units.temperature_label(),
                day.temperature_max,
                report.units.temperature_label(),
            )
        } else {
            format!("No weather data available for {}.", report.city)
        };

        let mut tips = vec!["Conditions can shift; check again closer to the time.".to_string()];
        let rainy = report
            .current
            .as_ref()
            .map(|c| c.condition.as_str())
            .or_else(|| report.forecast.first().map(|d| d.condition.as_str()))
            .is_some_and(|c| matches!(c, "Rain" | "Drizzle" | "Thunderstorm"));
        if rainy {
            tips.push("Take an umbrella.".to_string());
        }

        WeatherSummary { briefing, tips }
    }

    /// Render the report into the model's input format
    ///
    /// Returns `None` when the report has neither current conditions nor
    /// forecast days.
    fn describe(report: &WeatherReport, extras: &[String]) -> Option<String> {
        if report.current.is_none() && report.forecast.is_empty() {
            return None;
        }

        let mut lines = vec![
            format!("City: {}, {}", report.city, report.country),
            format!("Units: {}", report.units),
        ];
        if !extras.is_empty() {
            lines.push(format!("User asked about: {}", extras.join(", ")));
        }
        if let Some(current) = &report.current {
            lines.push(format!(
                "Current: {}, {:.1}{} (feels like {:.1}{}), humidity {}%, wind {:.1} {} from {}",
                current.description,
                current.temperature,
                report.units.temperature_label(),
                current.feels_like,
                report.units.temperature_label(),
                current.humidity,
                current.wind_speed,
                report.units.speed_label(),
                compass_point(f64::from(current.wind_direction_deg)),
            ));
        }
        for day in &report.forecast {
            lines.push(format!(
                "{}: {}, {:.0}{} to {:.0}{}, precipitation {}%",
                day.date,
                day.description,
                day.temperature_min,
                report.units.temperature_label(),
                day.temperature_max,
                report.units.temperature_label(),
                day.precipitation_probability,
            ));
        }

        Some(lines.join("\n"))
    }

    /// Parse the model response into a validated summary
    fn parse_response(response: &str) -> Result<WeatherSummary, String> {
        let json = IntentParser::extract_json(response)
            .ok_or_else(|| "no JSON object in model output".to_string())?;
        let raw: RawSummary =
            serde_json::from_str(json).map_err(|e| format!("JSON parse error: {e}"))?;

        let tips = raw
            .tips
            .unwrap_or_default()
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        WeatherSummary::new(raw.briefing, tips).map_err(|e| e.to_string())
    }
}
