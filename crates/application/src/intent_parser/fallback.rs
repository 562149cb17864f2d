//! Deterministic fallback intent extraction.
//!
//! Runs when the model is unreachable or returns something unusable.
//! Keyword and regex based, and total: every input string produces a
//! structurally valid [`Intent`].

use std::sync::LazyLock;

use domain::{DateSpec, Intent, PLACEHOLDER_CITY, UnitSystem};
use regex::Regex;
use tracing::debug;

use super::IntentParser;

#[allow(clippy::expect_used)]
static PREPOSITION_CITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:in|for|at)\s+(.+)").expect("valid regex"));

#[allow(clippy::expect_used)]
static COMPARE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bcompare\s+(.+)").expect("valid regex"));

#[allow(clippy::expect_used)]
static COMPARE_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+(?:and|vs\.?|versus)\s+|\s*,\s*").expect("valid regex"));

#[allow(clippy::expect_used)]
static COMPARE_DETECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:compare|vs\.?|versus)\b").expect("valid regex"));

#[allow(clippy::expect_used)]
static NUM_DAYS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d{1,2})\s*-?\s*day").expect("valid regex"));

/// Words that end a city name inside a query
const BOUNDARY_KEYWORDS: &[&str] = &[
    "today", "tomorrow", "tonight", "this", "next", "weekend", "week", "forecast", "weather",
    "now", "please", "and", "vs", "versus", "compare", "with", "in", "for", "at", "on", "over",
    "metric", "imperial", "celsius", "fahrenheit", "my", "here", "location",
];

/// Words skipped when they lead a city candidate
const LEADING_SKIP: &[&str] = &["in", "for", "at", "of", "the"];

impl IntentParser {
    /// Parse a query without the model (total, never fails)
    ///
    /// Produces the same field shape as the LLM path so the orchestrator
    /// cannot tell which parser ran.
    #[must_use]
    pub fn parse_fallback(&self, query: &str, default_units: UnitSystem) -> Intent {
        let lower = query.to_lowercase();

        let compare = COMPARE_DETECT.is_match(query);
        let mut cities = if compare {
            extract_compare_cities(query)
        } else {
            Vec::new()
        };
        if cities.len() < 2 {
            if let Some(city) = extract_single_city(query) {
                cities = vec![city];
            }
        }

        let use_ip_location = cities.is_empty();
        if use_ip_location {
            cities.push(PLACEHOLDER_CITY.to_string());
        }

        let date = detect_date(&lower, query);
        let units = detect_units(&lower, default_units);

        let mut intent = Intent {
            cities,
            date,
            units,
            extras: Vec::new(),
            use_ip_location,
            compare,
        };
        for tag in detect_extras(&lower) {
            intent.add_extra(tag);
        }
        intent.normalize();

        debug!(?intent, "Fallback-parsed intent");
        intent
    }
}

/// Extract the city following a preposition, bounded by temporal keywords
fn extract_single_city(query: &str) -> Option<String> {
    let captures = PREPOSITION_CITY.captures(query)?;
    let candidate = take_city_words(captures.get(1)?.as_str());
    (!candidate.is_empty()).then_some(candidate)
}

/// Extract city candidates from a comparison query
fn extract_compare_cities(query: &str) -> Vec<String> {
    let segment = COMPARE_PREFIX
        .captures(query)
        .and_then(|c| c.get(1))
        .map_or(query, |m| m.as_str());

    COMPARE_SPLIT
        .split(segment)
        .map(take_city_words)
        .filter(|c| !c.is_empty())
        .collect()
}

/// Keep the leading run of words that plausibly form a city name
fn take_city_words(candidate: &str) -> String {
    let mut words: Vec<String> = Vec::new();

    for word in candidate.split_whitespace() {
        let cleaned =
            word.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'' && c != '-');
        if cleaned.is_empty() {
            break;
        }
        let lowered = cleaned.to_lowercase();
        if words.is_empty() && LEADING_SKIP.contains(&lowered.as_str()) {
            continue;
        }
        if BOUNDARY_KEYWORDS.contains(&lowered.as_str())
            || lowered.starts_with(|c: char| c.is_ascii_digit())
        {
            break;
        }
        words.push(cleaned.to_string());
        // Punctuation after a word ends the city name
        if word.ends_with([',', '.', '?', '!', ';', ':']) {
            break;
        }
    }

    words.join(" ")
}

/// Date-window detection by keyword, in priority order
fn detect_date(lower: &str, original: &str) -> DateSpec {
    if lower.contains("tomorrow") {
        DateSpec::tomorrow()
    } else if lower.contains("weekend") {
        DateSpec::weekend()
    } else if lower.contains("forecast") || lower.contains("next") {
        let days = NUM_DAYS
            .captures(original)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<u8>().ok())
            .filter(|d| *d >= 1)
            .map_or(5, |d| d.min(16));
        DateSpec::range(days)
    } else {
        DateSpec::today()
    }
}

/// Unit-system detection by keyword
fn detect_units(lower: &str, default_units: UnitSystem) -> UnitSystem {
    if lower.contains("fahrenheit") || lower.contains("imperial") {
        UnitSystem::Imperial
    } else if lower.contains("celsius") || lower.contains("metric") {
        UnitSystem::Metric
    } else {
        default_units
    }
}

/// Presence-based topic tagging
fn detect_extras(lower: &str) -> Vec<&'static str> {
    let mut extras = Vec::new();
    if lower.contains("umbrella") {
        extras.push("umbrella");
    }
    if lower.contains("rain") || lower.contains("precipitation") {
        extras.push("rain");
    }
    if lower.contains("wind") {
        extras.push("wind");
    }
    if lower.contains("uv") || lower.contains("sun") {
        extras.push("uv");
    }
    extras
}
