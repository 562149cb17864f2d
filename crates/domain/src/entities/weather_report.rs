//! Normalized weather report
//!
//! Provider-agnostic weather record. Units are chosen once, when the
//! provider payload is normalized, and recorded on the report itself;
//! nothing downstream re-interprets the numbers.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::UnitSystem;

/// Current conditions for one city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Air temperature
    pub temperature: f64,
    /// Apparent (feels like) temperature
    pub feels_like: f64,
    /// Relative humidity percentage (0-100)
    pub humidity: u8,
    /// Surface pressure in hPa
    pub pressure: f64,
    /// Visibility in metres
    pub visibility: u32,
    /// Wind speed, in the report's unit system
    pub wind_speed: f64,
    /// Wind direction in degrees (0-359)
    pub wind_direction_deg: u16,
    /// Free-text condition description ("light rain")
    pub description: String,
    /// Provider icon id ("10d")
    pub icon: String,
    /// Condition group ("Rain", "Clear", ...)
    pub condition: String,
    /// Observation timestamp
    pub observed_at: DateTime<Utc>,
}

impl CurrentConditions {
    /// Display glyph for the condition group
    #[must_use]
    pub fn emoji(&self) -> &'static str {
        condition_emoji(&self.condition)
    }
}

/// One aggregated forecast day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    /// Forecast date (UTC calendar day)
    pub date: NaiveDate,
    /// Minimum temperature across the day's samples
    pub temperature_min: f64,
    /// Maximum temperature across the day's samples
    pub temperature_max: f64,
    /// Description of the dominant condition
    pub description: String,
    /// Icon of the dominant condition
    pub icon: String,
    /// Dominant condition group
    pub condition: String,
    /// Mean relative humidity (0-100)
    pub humidity: u8,
    /// Mean wind speed, rounded to one decimal
    pub wind_speed: f64,
    /// Peak precipitation probability (0-100)
    pub precipitation_probability: u8,
}

impl DailyForecast {
    /// Display glyph for the dominant condition
    #[must_use]
    pub fn emoji(&self) -> &'static str {
        condition_emoji(&self.condition)
    }
}

/// Normalized weather for one city, tagged with its unit system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    /// City name as resolved by the provider
    pub city: String,
    /// ISO-like country code
    pub country: String,
    /// Unit system every numeric field is expressed in
    pub units: UnitSystem,
    /// Current conditions, when requested
    pub current: Option<CurrentConditions>,
    /// Daily forecast entries, oldest first (empty for current-only)
    #[serde(default)]
    pub forecast: Vec<DailyForecast>,
}

impl WeatherReport {
    /// One-line rendering of the current conditions
    #[must_use]
    pub fn current_line(&self) -> Option<String> {
        self.current.as_ref().map(|c| {
            format!(
                "{} {} {:.1}{} (feels like {:.1}{}), humidity {}%, wind {:.1} {}",
                c.emoji(),
                c.description,
                c.temperature,
                self.units.temperature_label(),
                c.feels_like,
                self.units.temperature_label(),
                c.humidity,
                c.wind_speed,
                self.units.speed_label(),
            )
        })
    }

    /// One-line rendering of a forecast day
    #[must_use]
    pub fn forecast_line(&self, day: &DailyForecast) -> String {
        format!(
            "{} {} {} {:.0}{}/{:.0}{}, precip {}%",
            day.date.format("%a %d %b"),
            day.emoji(),
            day.description,
            day.temperature_max,
            self.units.temperature_label(),
            day.temperature_min,
            self.units.temperature_label(),
            day.precipitation_probability,
        )
    }
}

/// Display glyph for a provider condition group
#[must_use]
pub fn condition_emoji(condition: &str) -> &'static str {
    match condition {
        "Clear" => "☀️",
        "Clouds" => "☁️",
        "Rain" | "Drizzle" => "🌧️",
        "Thunderstorm" => "⛈️",
        "Snow" => "❄️",
        "Mist" | "Fog" | "Haze" => "🌫️",
        "Dust" | "Sand" | "Ash" => "🌪️",
        "Squall" | "Tornado" => "🌀",
        _ => "🌡️",
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn sample_current() -> CurrentConditions {
        CurrentConditions {
            temperature: 18.4,
            feels_like: 17.9,
            humidity: 62,
            pressure: 1014.0,
            visibility: 10_000,
            wind_speed: 4.2,
            wind_direction_deg: 210,
            description: "scattered clouds".to_string(),
            icon: "03d".to_string(),
            condition: "Clouds".to_string(),
            observed_at: Utc::now(),
        }
    }

    fn sample_day() -> DailyForecast {
        DailyForecast {
            date: NaiveDate::from_ymd_opt(2026, 8, 5).expect("valid date"),
            temperature_min: 12.0,
            temperature_max: 21.5,
            description: "light rain".to_string(),
            icon: "10d".to_string(),
            condition: "Rain".to_string(),
            humidity: 70,
            wind_speed: 3.6,
            precipitation_probability: 80,
        }
    }

    #[test]
    fn condition_emoji_known_groups() {
        assert_eq!(condition_emoji("Clear"), "☀️");
        assert_eq!(condition_emoji("Rain"), "🌧️");
        assert_eq!(condition_emoji("Drizzle"), "🌧️");
        assert_eq!(condition_emoji("Snow"), "❄️");
        assert_eq!(condition_emoji("Thunderstorm"), "⛈️");
        assert_eq!(condition_emoji("Fog"), "🌫️");
    }

    #[test]
    fn condition_emoji_unknown_group() {
        assert_eq!(condition_emoji("Plasma"), "🌡️");
    }

    #[test]
    fn current_line_includes_units() {
        let report = WeatherReport {
            city: "Lisbon".to_string(),
            country: "PT".to_string(),
            units: UnitSystem::Metric,
            current: Some(sample_current()),
            forecast: vec![],
        };

        let line = report.current_line().expect("has current");
        assert!(line.contains("scattered clouds"));
        assert!(line.contains("18.4°C"));
        assert!(line.contains("62%"));
        assert!(line.contains("4.2 m/s"));
    }

    #[test]
    fn current_line_imperial_labels() {
        let report = WeatherReport {
            city: "Boston".to_string(),
            country: "US".to_string(),
            units: UnitSystem::Imperial,
            current: Some(sample_current()),
            forecast: vec![],
        };

        let line = report.current_line().expect("has current");
        assert!(line.contains("°F"));
        assert!(line.contains("mph"));
    }

    #[test]
    fn current_line_absent_without_current() {
        let report = WeatherReport {
            city: "Lisbon".to_string(),
            country: "PT".to_string(),
            units: UnitSystem::Metric,
            current: None,
            forecast: vec![sample_day()],
        };
        assert!(report.current_line().is_none());
    }

    #[test]
    fn forecast_line_format() {
        let report = WeatherReport {
            city: "Lisbon".to_string(),
            country: "PT".to_string(),
            units: UnitSystem::Metric,
            current: None,
            forecast: vec![sample_day()],
        };

        let line = report.forecast_line(&report.forecast[0]);
        assert!(line.contains("light rain"));
        assert!(line.contains("22°C/12°C"));
        assert!(line.contains("precip 80%"));
    }

    #[test]
    fn report_serde_round_trip() {
        let report = WeatherReport {
            city: "Lisbon".to_string(),
            country: "PT".to_string(),
            units: UnitSystem::Metric,
            current: Some(sample_current()),
            forecast: vec![sample_day()],
        };

        let json = serde_json::to_string(&report).expect("serialize");
        let parsed: WeatherReport = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(report, parsed);
    }
}
