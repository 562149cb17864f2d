//! Day-bucketing of 3-hour forecast samples
//!
//! The provider answers forecast queries with sub-daily samples; this
//! module reduces them to one entry per UTC calendar day. Condition
//! selection is a majority vote over `(main, description)` pairs, ties
//! broken by first appearance.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate};
use domain::DailyForecast;
use tracing::warn;

use crate::models::ForecastSample;

/// Fallback condition for a day whose samples carry no condition entries
const FALLBACK_CONDITION: (&str, &str) = ("Clear", "Unknown");

/// Fallback icon when no sample matches the winning condition
const FALLBACK_ICON: &str = "01d";

/// Aggregate 3-hour samples into at most `days` daily entries
///
/// Buckets are keyed by the UTC calendar day of each sample; the first
/// `days` days (ascending) are kept, which also decides which days
/// survive when the provider returns more than requested.
pub(crate) fn aggregate_daily(samples: &[ForecastSample], days: usize) -> Vec<DailyForecast> {
    let mut buckets: BTreeMap<NaiveDate, Vec<&ForecastSample>> = BTreeMap::new();
    for sample in samples {
        let Some(timestamp) = DateTime::from_timestamp(sample.dt, 0) else {
            warn!(dt = sample.dt, "Skipping forecast sample with invalid timestamp");
            continue;
        };
        buckets
            .entry(timestamp.date_naive())
            .or_default()
            .push(sample);
    }

    buckets
        .into_iter()
        .take(days)
        .map(|(date, bucket)| aggregate_bucket(date, &bucket))
        .collect()
}

/// Collapse one day's samples into a single forecast entry
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn aggregate_bucket(date: NaiveDate, samples: &[&ForecastSample]) -> DailyForecast {
    let mut temperature_min = f64::INFINITY;
    let mut temperature_max = f64::NEG_INFINITY;
    let mut humidity_sum = 0u32;
    let mut wind_sum = 0.0f64;
    let mut pop_max = 0.0f64;

    for sample in samples {
        temperature_min = temperature_min.min(sample.main.temp);
        temperature_max = temperature_max.max(sample.main.temp);
        humidity_sum += u32::from(sample.main.humidity);
        wind_sum += sample.wind.speed;
        pop_max = pop_max.max(sample.pop.unwrap_or(0.0));
    }

    // Buckets are only created with at least one sample
    let count = samples.len().max(1) as f64;
    let humidity = (f64::from(humidity_sum) / count).round() as u8;
    let wind_speed = (wind_sum / count * 10.0).round() / 10.0;
    let precipitation_probability = (pop_max.clamp(0.0, 1.0) * 100.0).round() as u8;

    let (condition, description) = select_condition(samples);
    let icon = samples
        .iter()
        .filter_map(|s| s.weather.first())
        .find(|entry| entry.main == condition && entry.description == description)
        .map_or_else(|| FALLBACK_ICON.to_string(), |entry| entry.icon.clone());

    DailyForecast {
        date,
        temperature_min,
        temperature_max,
        description,
        icon,
        condition,
        humidity,
        wind_speed,
        precipitation_probability,
    }
}

/// Majority vote over `(main, description)` pairs
///
/// Ties go to the pair seen first. A bucket with no condition entries at
/// all gets a fixed fallback rather than failing the whole forecast.
fn select_condition(samples: &[&ForecastSample]) -> (String, String) {
    // Insertion-ordered tally so ties resolve to the first-encountered pair
    let mut tally: Vec<((&str, &str), usize)> = Vec::new();

    for sample in samples {
        let Some(entry) = sample.weather.first() else {
            continue;
        };
        let key = (entry.main.as_str(), entry.description.as_str());
        match tally.iter_mut().find(|(k, _)| *k == key) {
            Some((_, count)) => *count += 1,
            None => tally.push((key, 1)),
        }
    }

    // max_by_key would hand ties to the last entry; scan manually so the
    // first-encountered pair wins
    let mut best: Option<(&(&str, &str), usize)> = None;
    for (key, count) in &tally {
        if best.is_none_or(|(_, best_count)| *count > best_count) {
            best = Some((key, *count));
        }
    }

    best.map_or(
        (
            FALLBACK_CONDITION.0.to_string(),
            FALLBACK_CONDITION.1.to_string(),
        ),
        |((main, description), _)| ((*main).to_string(), (*description).to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConditionEntry, MainData, WindData};

    /// Seconds since epoch for 2026-08-04 00:00 UTC
    const DAY_ONE: i64 = 1_785_801_600;
    const DAY_SECS: i64 = 86_400;

    fn sample(dt: i64, temp: f64, condition: Option<(&str, &str, &str)>) -> ForecastSample {
        ForecastSample {
            dt,
            main: MainData {
                temp,
                feels_like: temp - 1.0,
                humidity: 60,
                pressure: 1010.0,
            },
            weather: condition
                .map(|(main, description, icon)| ConditionEntry {
                    main: main.to_string(),
                    description: description.to_string(),
                    icon: icon.to_string(),
                })
                .into_iter()
                .collect(),
            wind: WindData {
                speed: 4.0,
                deg: Some(180),
            },
            pop: Some(0.2),
        }
    }

    #[test]
    fn majority_vote_picks_dominant_condition() {
        let samples = vec![
            sample(DAY_ONE, 10.0, Some(("Rain", "light rain", "10d"))),
            sample(DAY_ONE + 10_800, 20.0, Some(("Rain", "light rain", "10d"))),
            sample(DAY_ONE + 21_600, 15.0, Some(("Clear", "clear sky", "01d"))),
        ];

        let days = aggregate_daily(&samples, 5);
        assert_eq!(days.len(), 1);
        assert!((days[0].temperature_min - 10.0).abs() < f64::EPSILON);
        assert!((days[0].temperature_max - 20.0).abs() < f64::EPSILON);
        assert_eq!(days[0].condition, "Rain");
        assert_eq!(days[0].description, "light rain");
        assert_eq!(days[0].icon, "10d");
    }

    #[test]
    fn tie_breaks_to_first_encountered_pair() {
        let samples = vec![
            sample(DAY_ONE, 10.0, Some(("Clouds", "few clouds", "02d"))),
            sample(DAY_ONE + 10_800, 12.0, Some(("Clear", "clear sky", "01d"))),
        ];

        let days = aggregate_daily(&samples, 5);
        assert_eq!(days[0].condition, "Clouds");
        assert_eq!(days[0].description, "few clouds");
    }

    #[test]
    fn conditionless_bucket_gets_fallback() {
        let samples = vec![
            sample(DAY_ONE, 10.0, None),
            sample(DAY_ONE + 10_800, 12.0, None),
        ];

        let days = aggregate_daily(&samples, 5);
        assert_eq!(days[0].condition, "Clear");
        assert_eq!(days[0].description, "Unknown");
        assert_eq!(days[0].icon, FALLBACK_ICON);
    }

    #[test]
    fn samples_bucket_by_utc_day_and_sort_ascending() {
        let samples = vec![
            sample(DAY_ONE + DAY_SECS, 8.0, Some(("Clear", "clear sky", "01d"))),
            sample(DAY_ONE, 11.0, Some(("Clear", "clear sky", "01d"))),
            sample(DAY_ONE + 2 * DAY_SECS, 9.0, Some(("Clear", "clear sky", "01d"))),
        ];

        let days = aggregate_daily(&samples, 5);
        assert_eq!(days.len(), 3);
        assert!(days[0].date < days[1].date);
        assert!(days[1].date < days[2].date);
    }

    #[test]
    fn keeps_only_first_requested_days() {
        let samples: Vec<ForecastSample> = (0..4)
            .map(|day| {
                sample(
                    DAY_ONE + day * DAY_SECS,
                    10.0,
                    Some(("Clear", "clear sky", "01d")),
                )
            })
            .collect();

        let days = aggregate_daily(&samples, 2);
        assert_eq!(days.len(), 2);
    }

    #[test]
    fn humidity_is_arithmetic_mean() {
        let mut a = sample(DAY_ONE, 10.0, Some(("Clear", "clear sky", "01d")));
        a.main.humidity = 40;
        let mut b = sample(DAY_ONE + 10_800, 10.0, Some(("Clear", "clear sky", "01d")));
        b.main.humidity = 61;

        let days = aggregate_daily(&[a, b], 1);
        // (40 + 61) / 2 = 50.5, rounds to 51
        assert_eq!(days[0].humidity, 51);
    }

    #[test]
    fn wind_speed_mean_rounds_to_one_decimal() {
        let mut a = sample(DAY_ONE, 10.0, Some(("Clear", "clear sky", "01d")));
        a.wind.speed = 3.0;
        let mut b = sample(DAY_ONE + 10_800, 10.0, Some(("Clear", "clear sky", "01d")));
        b.wind.speed = 4.25;

        let days = aggregate_daily(&[a, b], 1);
        // (3.0 + 4.25) / 2 = 3.625 -> 3.6
        assert!((days[0].wind_speed - 3.6).abs() < 1e-9);
    }

    #[test]
    fn precipitation_is_scaled_max() {
        let mut a = sample(DAY_ONE, 10.0, Some(("Rain", "light rain", "10d")));
        a.pop = Some(0.35);
        let mut b = sample(DAY_ONE + 10_800, 10.0, Some(("Rain", "light rain", "10d")));
        b.pop = Some(0.8);
        let mut c = sample(DAY_ONE + 21_600, 10.0, Some(("Rain", "light rain", "10d")));
        c.pop = None;

        let days = aggregate_daily(&[a, b, c], 1);
        assert_eq!(days[0].precipitation_probability, 80);
    }

    #[test]
    fn empty_input_yields_no_days() {
        assert!(aggregate_daily(&[], 5).is_empty());
    }

    #[test]
    fn zero_days_requested_yields_nothing() {
        let samples = vec![sample(DAY_ONE, 10.0, Some(("Clear", "clear sky", "01d")))];
        assert!(aggregate_daily(&samples, 0).is_empty());
    }
}
