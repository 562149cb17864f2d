//! Intent parser - Parse natural language weather queries
//!
//! This module is split into focused sub-modules:
//! - [`llm`]: LLM-powered intent extraction with a strict JSON contract
//! - [`fallback`]: deterministic keyword/regex parser used when the
//!   model is unavailable or returns something unusable
//!
//! Both paths produce the same [`Intent`] shape, so downstream code
//! never knows which one ran.

mod fallback;
mod llm;

use domain::{DateSpec, Intent, PLACEHOLDER_CITY, UnitSystem};
use serde::Deserialize;

/// System prompt for intent extraction
pub(crate) const INTENT_SYSTEM_PROMPT: &str = r#"You are an intent extractor for a weather assistant.
Analyze the user query and extract the request as JSON.

Fields:
- "cities": list of city names in the order mentioned (use ["Unknown"] when the user means their own location)
- "date": {"kind": "today"|"tomorrow"|"range", "days": 1-16 (only for range), "weekend": true|false}
- "units": "metric" or "imperial" (omit if the user does not say)
- "extras": topic tags the user asks about, chosen from "umbrella", "rain", "wind", "uv"
- "use_ip_location": true when the user says "here", "my location", or similar
- "compare": true when two or more cities are being compared

Reply ONLY with valid JSON:
{
  "cities": ["..."],
  "date": {"kind": "today", "days": 3, "weekend": false},
  "units": "metric",
  "extras": ["..."],
  "use_ip_location": false,
  "compare": false
}

Examples:
- "weather in Paris" → {"cities":["Paris"],"date":{"kind":"today"},"compare":false,"use_ip_location":false}
- "will I need an umbrella tomorrow in Berlin?" → {"cities":["Berlin"],"date":{"kind":"tomorrow"},"extras":["umbrella"],"compare":false,"use_ip_location":false}
- "5 day forecast for Tokyo" → {"cities":["Tokyo"],"date":{"kind":"range","days":5},"compare":false,"use_ip_location":false}
- "weekend weather in Oslo in fahrenheit" → {"cities":["Oslo"],"date":{"kind":"range","days":2,"weekend":true},"units":"imperial","compare":false,"use_ip_location":false}
- "weather here" → {"cities":["Unknown"],"date":{"kind":"today"},"use_ip_location":true,"compare":false}
- "compare London and Paris weather" → {"cities":["London","Paris"],"date":{"kind":"today"},"compare":true,"use_ip_location":false}"#;

/// Raw intent as produced by the model, before schema validation
#[derive(Debug, Deserialize)]
pub(crate) struct RawIntent {
    #[serde(default)]
    pub cities: Option<Vec<String>>,
    #[serde(default)]
    pub date: Option<RawDate>,
    #[serde(default)]
    pub units: Option<String>,
    #[serde(default)]
    pub extras: Option<Vec<String>>,
    #[serde(default)]
    pub use_ip_location: Option<bool>,
    #[serde(default)]
    pub compare: Option<bool>,
}

/// Raw date window from the model
#[derive(Debug, Deserialize)]
pub(crate) struct RawDate {
    pub kind: String,
    #[serde(default)]
    pub days: Option<u8>,
    #[serde(default)]
    pub weekend: Option<bool>,
}

/// Parser for converting natural language queries into an [`Intent`]
#[derive(Debug, Clone, Copy, Default)]
pub struct IntentParser;

impl IntentParser {
    /// Create a new intent parser
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Extract the first balanced `{...}` block from a model response
    ///
    /// Models occasionally wrap the JSON in commentary or code fences;
    /// a depth-counting scan (string-aware, so braces inside values
    /// don't confuse it) recovers the object itself.
    pub(crate) fn extract_json(response: &str) -> Option<&str> {
        let start = response.find('{')?;
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;

        for (offset, ch) in response[start..].char_indices() {
            if escaped {
                escaped = false;
                continue;
            }
            match ch {
                '\\' if in_string => escaped = true,
                '"' => in_string = !in_string,
                '{' if !in_string => depth += 1,
                '}' if !in_string => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(&response[start..=start + offset]);
                    }
                },
                _ => {},
            }
        }

        None
    }

    /// Validate a raw intent against the schema and build the [`Intent`]
    ///
    /// Collects every offending field name so the error pinpoints what
    /// the model got wrong.
    pub(crate) fn intent_from_raw(
        raw: RawIntent,
        default_units: UnitSystem,
    ) -> Result<Intent, String> {
        let mut bad_fields: Vec<&str> = Vec::new();
        let use_ip_location = raw.use_ip_location.unwrap_or(false);

        let mut cities: Vec<String> = raw
            .cities
            .unwrap_or_default()
            .into_iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        if cities.is_empty() {
            if use_ip_location {
                cities.push(PLACEHOLDER_CITY.to_string());
            } else {
                bad_fields.push("cities");
            }
        }

        let date = match raw.date {
            None => DateSpec::today(),
            Some(d) => {
                let weekend = d.weekend.unwrap_or(false);
                match d.kind.as_str() {
                    "today" => DateSpec::today(),
                    "tomorrow" => DateSpec::tomorrow(),
                    "range" => match d.days {
                        Some(0) => {
                            bad_fields.push("date.days");
                            DateSpec::today()
                        },
                        Some(days) => DateSpec {
                            kind: domain::DateKind::Range,
                            days: Some(days),
                            weekend,
                        },
                        None => DateSpec {
                            kind: domain::DateKind::Range,
                            days: Some(if weekend { 2 } else { 3 }),
                            weekend,
                        },
                    },
                    _ => {
                        bad_fields.push("date.kind");
                        DateSpec::today()
                    },
                }
            },
        };

        let units = match raw.units.as_deref() {
            None => default_units,
            Some(value) => value.parse().unwrap_or_else(|_| {
                bad_fields.push("units");
                default_units
            }),
        };

        if !bad_fields.is_empty() {
            return Err(format!(
                "schema validation failed for fields: {}",
                bad_fields.join(", ")
            ));
        }

        let mut intent = Intent {
            cities,
            date,
            units,
            extras: Vec::new(),
            use_ip_location,
            compare: raw.compare.unwrap_or(false),
        };
        for tag in raw.extras.unwrap_or_default() {
            let tag = tag.trim().to_lowercase();
            if !tag.is_empty() {
                intent.add_extra(&tag);
            }
        }
        intent.normalize();
        Ok(intent)
    }
}
