//! Parsed weather-query intent

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::UnitSystem;

/// City name used until IP geolocation resolves the real one
pub const PLACEHOLDER_CITY: &str = "Unknown";

/// Which slice of time a query asks about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateKind {
    /// Current conditions plus today's outlook
    Today,
    /// Tomorrow only
    Tomorrow,
    /// A multi-day range
    Range,
}

/// The requested date window of a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSpec {
    /// Kind of window
    pub kind: DateKind,
    /// Number of days for `Range` queries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<u8>,
    /// Whether the range was phrased as "the weekend"
    #[serde(default)]
    pub weekend: bool,
}

impl DateSpec {
    /// A plain "today" request
    #[must_use]
    pub const fn today() -> Self {
        Self {
            kind: DateKind::Today,
            days: None,
            weekend: false,
        }
    }

    /// A "tomorrow" request
    #[must_use]
    pub const fn tomorrow() -> Self {
        Self {
            kind: DateKind::Tomorrow,
            days: None,
            weekend: false,
        }
    }

    /// A multi-day range of the given length
    #[must_use]
    pub const fn range(days: u8) -> Self {
        Self {
            kind: DateKind::Range,
            days: Some(days),
            weekend: false,
        }
    }

    /// A weekend range (two days)
    #[must_use]
    pub const fn weekend() -> Self {
        Self {
            kind: DateKind::Range,
            days: Some(2),
            weekend: true,
        }
    }

    /// How many forecast days this window asks for
    ///
    /// `Range` without an explicit count defaults to 3 days, or 2 when
    /// phrased as a weekend.
    #[must_use]
    pub fn requested_days(&self) -> u8 {
        match self.kind {
            DateKind::Today | DateKind::Tomorrow => 1,
            DateKind::Range => self.days.unwrap_or(if self.weekend { 2 } else { 3 }),
        }
    }
}

impl Default for DateSpec {
    fn default() -> Self {
        Self::today()
    }
}

/// Structured representation of a parsed natural-language weather query
///
/// Created fresh per query by the intent parser (LLM path or fallback
/// path; both produce the same shape). The only mutation afterwards is
/// [`Intent::resolve_location`], which swaps the geolocation placeholder
/// for a real city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    /// Cities to query, in request order (never empty)
    pub cities: Vec<String>,
    /// Requested date window
    pub date: DateSpec,
    /// Unit system for all numeric output
    pub units: UnitSystem,
    /// Topic tags the user asked about ("umbrella", "wind", ...)
    #[serde(default)]
    pub extras: Vec<String>,
    /// Whether the location should come from IP geolocation
    #[serde(default)]
    pub use_ip_location: bool,
    /// Whether this is a multi-city comparison
    #[serde(default)]
    pub compare: bool,
}

impl Intent {
    /// Create an intent for an explicit list of cities
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidIntent` if `cities` is empty.
    pub fn new(cities: Vec<String>, date: DateSpec, units: UnitSystem) -> Result<Self, DomainError> {
        let intent = Self {
            cities,
            date,
            units,
            extras: Vec::new(),
            use_ip_location: false,
            compare: false,
        };
        intent.validate()?;
        Ok(intent)
    }

    /// Create an intent whose city comes from IP geolocation
    #[must_use]
    pub fn for_ip_location(date: DateSpec, units: UnitSystem) -> Self {
        Self {
            cities: vec![PLACEHOLDER_CITY.to_string()],
            date,
            units,
            extras: Vec::new(),
            use_ip_location: true,
            compare: false,
        }
    }

    /// Check the structural invariants
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidIntent` when cities is empty, a
    /// comparison has fewer than two cities, or a range is missing its
    /// day count.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.cities.is_empty() {
            return Err(DomainError::InvalidIntent(
                "cities must not be empty".to_string(),
            ));
        }
        if self.compare && self.cities.len() < 2 {
            return Err(DomainError::InvalidIntent(
                "comparison requires at least two cities".to_string(),
            ));
        }
        if self.date.kind == DateKind::Range && self.date.days.is_none() {
            return Err(DomainError::InvalidIntent(
                "range queries must carry a day count".to_string(),
            ));
        }
        Ok(())
    }

    /// Repair an intent so that [`Intent::validate`] holds
    ///
    /// Fills the range-day default, downgrades under-populated
    /// comparisons, and restores the placeholder city when the list came
    /// back empty. Both parser paths call this before handing the intent
    /// to the orchestrator.
    pub fn normalize(&mut self) {
        if self.cities.is_empty() {
            self.cities.push(PLACEHOLDER_CITY.to_string());
            self.use_ip_location = true;
        }
        if self.compare && self.cities.len() < 2 {
            self.compare = false;
        }
        if self.date.kind == DateKind::Range && self.date.days.is_none() {
            self.date.days = Some(if self.date.weekend { 2 } else { 3 });
        }
    }

    /// Replace the geolocation placeholder with a resolved city
    ///
    /// Only the first city is ever a placeholder; the flag is cleared so
    /// the substitution happens at most once.
    pub fn resolve_location(&mut self, city: String) {
        if self.use_ip_location {
            if let Some(first) = self.cities.first_mut() {
                *first = city;
            }
            self.use_ip_location = false;
        }
    }

    /// Add a topic tag, ignoring duplicates
    pub fn add_extra(&mut self, tag: &str) {
        if !self.extras.iter().any(|t| t == tag) {
            self.extras.push(tag.to_string());
        }
    }
}
