//! Query orchestrator
//!
//! Sequences the full pipeline: parse intent (LLM, then fallback),
//! resolve IP-based locations, fetch weather (with concurrent fan-out
//! for comparisons), and attach an optional summary. Used identically
//! by the CLI and the HTTP API so the two surfaces cannot diverge.

use std::sync::Arc;

use domain::{DateKind, Intent, UnitSystem, WeatherReport, WeatherSummary};
use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::error::ApplicationError;
use crate::intent_parser::IntentParser;
use crate::ports::{GeoIpPort, GeoLocation, InferencePort, WeatherPort};
use crate::services::SummaryService;

/// What to do when IP geolocation fails
///
/// The CLI surfaces the failure; the HTTP weather endpoint keeps the
/// request alive by substituting a configured city. The asymmetry is
/// intentional and fixed per call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationPolicy {
    /// Fail the whole query
    Fail,
    /// Substitute this city and continue
    Default(String),
}

/// Combined result of one processed query
#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    /// The intent that drove the fetches (after location resolution)
    pub intent: Intent,
    /// One report per successfully fetched city, in input order
    pub reports: Vec<WeatherReport>,
    /// Narrative summary, when requested and derivable
    pub summary: Option<WeatherSummary>,
}

/// Orchestrates parsing, geolocation, fetching, and summarization
pub struct QueryService {
    inference: Arc<dyn InferencePort>,
    weather: Arc<dyn WeatherPort>,
    geoip: Arc<dyn GeoIpPort>,
    parser: IntentParser,
    summaries: SummaryService,
    default_units: UnitSystem,
    location_policy: LocationPolicy,
}

impl std::fmt::Debug for QueryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryService")
            .field("default_units", &self.default_units)
            .field("location_policy", &self.location_policy)
            .finish_non_exhaustive()
    }
}

impl QueryService {
    /// Create a new query service over the given ports
    #[must_use]
    pub fn new(
        inference: Arc<dyn InferencePort>,
        weather: Arc<dyn WeatherPort>,
        geoip: Arc<dyn GeoIpPort>,
        default_units: UnitSystem,
        location_policy: LocationPolicy,
    ) -> Self {
        Self {
            inference,
            weather,
            geoip,
            parser: IntentParser::new(),
            summaries: SummaryService::new(),
            default_units,
            location_policy,
        }
    }

    /// Process a free-text weather query end to end
    pub async fn process(
        &self,
        query: &str,
        with_summary: bool,
    ) -> Result<QueryResponse, ApplicationError> {
        self.process_with(query, None, with_summary).await
    }

    /// Process a query with a caller-supplied default unit system
    ///
    /// `default_units` overrides the configured default for this request
    /// only; an explicit unit mention in the query still wins.
    #[instrument(skip(self, query), fields(query_len = query.len()))]
    pub async fn process_with(
        &self,
        query: &str,
        default_units: Option<UnitSystem>,
        with_summary: bool,
    ) -> Result<QueryResponse, ApplicationError> {
        let units = default_units.unwrap_or(self.default_units);

        // Intent parsing never fails the query: the fallback parser is total.
        let mut intent = match self.parser.parse(&self.inference, query, units).await {
            Ok(intent) => intent,
            Err(e) => {
                warn!(error = %e, "LLM intent parsing failed, using fallback parser");
                self.parser.parse_fallback(query, units)
            },
        };
        debug!(?intent, "Parsed intent");

        if intent.use_ip_location {
            match self.geoip.current_location().await {
                Ok(location) => intent.resolve_location(location.city),
                Err(e) => match &self.location_policy {
                    LocationPolicy::Fail => {
                        return Err(ApplicationError::GeoIp(format!(
                            "failed to resolve your location: {e}"
                        )));
                    },
                    LocationPolicy::Default(city) => {
                        warn!(error = %e, default_city = %city, "Geolocation failed, using default city");
                        intent.resolve_location(city.clone());
                    },
                },
            }
        }

        let reports = self.fetch_reports(&intent).await?;

        let summary = if with_summary {
            self.summarize(&reports[0], &intent.extras).await
        } else {
            None
        };

        Ok(QueryResponse {
            intent,
            reports,
            summary,
        })
    }

    /// Fetch current weather and a forecast for one city (HTTP forecast endpoint)
    ///
    /// The forecast is the point of the call; a failed current-conditions
    /// fetch is tolerated and logged.
    #[instrument(skip(self))]
    pub async fn forecast_direct(
        &self,
        city: &str,
        days: u8,
        units: UnitSystem,
    ) -> Result<WeatherReport, ApplicationError> {
        let (current, forecast) = tokio::join!(
            self.weather.current_weather(city, units),
            self.weather.forecast(city, days, units),
        );

        let mut report = forecast?;
        match current {
            Ok(current_report) => report.current = current_report.current,
            Err(e) => warn!(error = %e, "Current conditions unavailable for forecast response"),
        }
        Ok(report)
    }

    /// Fetch current weather for several cities concurrently (HTTP compare endpoint)
    #[instrument(skip(self, cities), fields(city_count = cities.len()))]
    pub async fn compare_direct(
        &self,
        cities: &[String],
        units: UnitSystem,
    ) -> Result<Vec<WeatherReport>, ApplicationError> {
        if cities.len() < 2 {
            return Err(ApplicationError::Validation(
                "comparison requires at least two cities".to_string(),
            ));
        }
        self.fan_out_current(cities, units).await
    }

    /// Resolve the caller's location via the geolocation port
    pub async fn locate(&self) -> Result<GeoLocation, ApplicationError> {
        self.geoip.current_location().await
    }

    /// Generate a summary, degrading to `None` instead of failing
    pub async fn summarize(
        &self,
        report: &WeatherReport,
        extras: &[String],
    ) -> Option<WeatherSummary> {
        match self
            .summaries
            .generate(&self.inference, report, extras)
            .await
        {
            Ok(summary) => Some(summary),
            Err(e) => {
                warn!(error = %e, "Summary generation failed, omitting summary");
                None
            },
        }
    }

    /// Whether the weather provider and model backend look usable
    pub async fn health(&self) -> (bool, bool) {
        let (weather, inference) =
            tokio::join!(self.weather.is_available(), self.inference.is_healthy());
        (weather, inference)
    }

    /// Model identifier, for status output
    #[must_use]
    pub fn model(&self) -> String {
        self.inference.current_model()
    }

    /// Fetch one report per intent city, fanning out for comparisons
    async fn fetch_reports(
        &self,
        intent: &Intent,
    ) -> Result<Vec<WeatherReport>, ApplicationError> {
        if intent.compare && intent.cities.len() >= 2 {
            if intent.date.kind == DateKind::Today {
                return self.fan_out_current(&intent.cities, intent.units).await;
            }
            let futures = intent
                .cities
                .iter()
                .map(|city| self.fetch_city(city, intent));
            return Self::collect_fan_out(&intent.cities, join_all(futures).await);
        }

        let city = intent
            .cities
            .first()
            .ok_or_else(|| ApplicationError::Internal("intent without cities".to_string()))?;
        Ok(vec![self.fetch_city(city, intent).await?])
    }

    /// Fetch a single city according to the intent's date window
    async fn fetch_city(
        &self,
        city: &str,
        intent: &Intent,
    ) -> Result<WeatherReport, ApplicationError> {
        match intent.date.kind {
            DateKind::Today => self.weather.current_weather(city, intent.units).await,
            DateKind::Tomorrow => {
                // The provider has no direct "tomorrow" query: fetch two
                // days and keep the second.
                let mut report = self.weather.forecast(city, 2, intent.units).await?;
                if report.forecast.len() >= 2 {
                    let tomorrow = report.forecast.swap_remove(1);
                    report.forecast = vec![tomorrow];
                }
                Ok(report)
            },
            DateKind::Range => {
                self.weather
                    .forecast(city, intent.date.requested_days(), intent.units)
                    .await
            },
        }
    }

    /// Concurrent current-weather fetches with partial-failure tolerance
    async fn fan_out_current(
        &self,
        cities: &[String],
        units: UnitSystem,
    ) -> Result<Vec<WeatherReport>, ApplicationError> {
        let futures = cities
            .iter()
            .map(|city| self.weather.current_weather(city, units));
        Self::collect_fan_out(cities, join_all(futures).await)
    }

    /// Keep successful reports in input order; fail only when all failed
    fn collect_fan_out(
        cities: &[String],
        results: Vec<Result<WeatherReport, ApplicationError>>,
    ) -> Result<Vec<WeatherReport>, ApplicationError> {
        let mut reports = Vec::with_capacity(results.len());
        let mut first_error = None;

        for (city, result) in cities.iter().zip(results) {
            match result {
                Ok(report) => reports.push(report),
                Err(e) => {
                    warn!(city = %city, error = %e, "City fetch failed during comparison");
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                },
            }
        }

        if reports.is_empty() {
            Err(first_error
                .unwrap_or_else(|| ApplicationError::Internal("empty comparison".to_string())))
        } else {
            Ok(reports)
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use domain::DailyForecast;

    use super::*;
    use crate::ports::{MockGeoIpPort, MockInferencePort, MockWeatherPort};

    fn report(city: &str) -> WeatherReport {
        WeatherReport {
            city: city.to_string(),
            country: "XX".to_string(),
            units: UnitSystem::Metric,
            current: None,
            forecast: vec![],
        }
    }

    fn day(date: (i32, u32, u32)) -> DailyForecast {
        DailyForecast {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).expect("valid date"),
            temperature_min: 10.0,
            temperature_max: 20.0,
            description: "clear sky".to_string(),
            icon: "01d".to_string(),
            condition: "Clear".to_string(),
            humidity: 50,
            wind_speed: 3.0,
            precipitation_probability: 10,
        }
    }

    fn inference_unavailable() -> MockInferencePort {
        let mut mock = MockInferencePort::new();
        mock.expect_generate_with_system()
            .returning(|_, _| Err(ApplicationError::Internal("model down".to_string())));
        mock
    }

    fn service(
        inference: MockInferencePort,
        weather: MockWeatherPort,
        geoip: MockGeoIpPort,
        policy: LocationPolicy,
    ) -> QueryService {
        QueryService::new(
            Arc::new(inference),
            Arc::new(weather),
            Arc::new(geoip),
            UnitSystem::Metric,
            policy,
        )
    }

    #[tokio::test]
    async fn five_day_forecast_drives_range_fetch() {
        let mut weather = MockWeatherPort::new();
        weather
            .expect_forecast()
            .withf(|city, days, units| city == "Tokyo" && *days == 5 && *units == UnitSystem::Metric)
            .times(1)
            .returning(|city, _, _| Ok(report(city)));

        let svc = service(
            inference_unavailable(),
            weather,
            MockGeoIpPort::new(),
            LocationPolicy::Fail,
        );

        let response = svc
            .process("5 day forecast for Tokyo", false)
            .await
            .expect("response");
        assert_eq!(response.reports.len(), 1);
        assert_eq!(response.reports[0].city, "Tokyo");
        assert!(response.summary.is_none());
    }

    #[tokio::test]
    async fn weather_here_substitutes_geolocated_city() {
        let mut geoip = MockGeoIpPort::new();
        geoip.expect_current_location().times(1).returning(|| {
            Ok(GeoLocation {
                city: "Berlin".to_string(),
                country: "Germany".to_string(),
                region: "Berlin".to_string(),
                coordinates: domain::Coordinates::new(52.52, 13.405).expect("valid"),
                timezone: "Europe/Berlin".to_string(),
            })
        });

        let mut weather = MockWeatherPort::new();
        weather
            .expect_current_weather()
            .withf(|city, _| city == "Berlin")
            .times(1)
            .returning(|city, _| Ok(report(city)));

        let svc = service(inference_unavailable(), weather, geoip, LocationPolicy::Fail);

        let response = svc.process("weather here", false).await.expect("response");
        assert_eq!(response.intent.cities, vec!["Berlin"]);
        assert!(!response.intent.use_ip_location);
    }

    #[tokio::test]
    async fn geoip_failure_fails_query_under_strict_policy() {
        let mut geoip = MockGeoIpPort::new();
        geoip
            .expect_current_location()
            .returning(|| Err(ApplicationError::GeoIp("rate limited".to_string())));

        let svc = service(
            inference_unavailable(),
            MockWeatherPort::new(),
            geoip,
            LocationPolicy::Fail,
        );

        let result = svc.process("weather here", false).await;
        let Err(ApplicationError::GeoIp(message)) = result else {
            unreachable!("expected geoip error");
        };
        assert!(message.contains("failed to resolve your location"));
    }

    #[tokio::test]
    async fn geoip_failure_uses_default_city_under_lenient_policy() {
        let mut geoip = MockGeoIpPort::new();
        geoip
            .expect_current_location()
            .returning(|| Err(ApplicationError::GeoIp("timeout".to_string())));

        let mut weather = MockWeatherPort::new();
        weather
            .expect_current_weather()
            .withf(|city, _| city == "London")
            .times(1)
            .returning(|city, _| Ok(report(city)));

        let svc = service(
            inference_unavailable(),
            weather,
            geoip,
            LocationPolicy::Default("London".to_string()),
        );

        let response = svc.process("weather here", false).await.expect("response");
        assert_eq!(response.intent.cities, vec!["London"]);
    }

    #[tokio::test]
    async fn comparison_fans_out_and_tolerates_one_failure() {
        let mut weather = MockWeatherPort::new();
        weather
            .expect_current_weather()
            .withf(|city, _| city == "London")
            .times(1)
            .returning(|city, _| Ok(report(city)));
        weather
            .expect_current_weather()
            .withf(|city, _| city == "Paris")
            .times(1)
            .returning(|_, _| {
                Err(ApplicationError::provider(
                    crate::ProviderErrorKind::LocationNotFound,
                    "no such city",
                ))
            });

        let svc = service(
            inference_unavailable(),
            weather,
            MockGeoIpPort::new(),
            LocationPolicy::Fail,
        );

        let response = svc
            .process("compare London and Paris weather", false)
            .await
            .expect("response");
        assert_eq!(response.reports.len(), 1);
        assert_eq!(response.reports[0].city, "London");
    }

    #[tokio::test]
    async fn comparison_fails_when_every_city_fails() {
        let mut weather = MockWeatherPort::new();
        weather.expect_current_weather().times(2).returning(|_, _| {
            Err(ApplicationError::provider(
                crate::ProviderErrorKind::Timeout,
                "timed out",
            ))
        });

        let svc = service(
            inference_unavailable(),
            weather,
            MockGeoIpPort::new(),
            LocationPolicy::Fail,
        );

        let result = svc.process("compare London and Paris weather", false).await;
        assert!(matches!(result, Err(ApplicationError::Provider { .. })));
    }

    #[tokio::test]
    async fn tomorrow_fetches_two_days_and_keeps_the_second() {
        let mut weather = MockWeatherPort::new();
        weather
            .expect_forecast()
            .withf(|city, days, _| city == "Rome" && *days == 2)
            .times(1)
            .returning(|city, _, _| {
                let mut r = report(city);
                r.forecast = vec![day((2026, 8, 4)), day((2026, 8, 5))];
                Ok(r)
            });

        let svc = service(
            inference_unavailable(),
            weather,
            MockGeoIpPort::new(),
            LocationPolicy::Fail,
        );

        let response = svc
            .process("weather tomorrow in Rome", false)
            .await
            .expect("response");
        assert_eq!(response.reports[0].forecast.len(), 1);
        assert_eq!(
            response.reports[0].forecast[0].date,
            NaiveDate::from_ymd_opt(2026, 8, 5).expect("valid date")
        );
    }

    #[tokio::test]
    async fn summary_is_omitted_when_generation_fails() {
        // A report with no data makes the summary service error out;
        // the orchestrator must swallow that and answer anyway.
        let mut weather = MockWeatherPort::new();
        weather
            .expect_current_weather()
            .returning(|city, _| Ok(report(city)));

        let svc = service(
            inference_unavailable(),
            weather,
            MockGeoIpPort::new(),
            LocationPolicy::Fail,
        );

        let response = svc
            .process("weather in Madrid", true)
            .await
            .expect("response");
        assert!(response.summary.is_none());
    }

    #[tokio::test]
    async fn compare_direct_rejects_single_city() {
        let svc = service(
            MockInferencePort::new(),
            MockWeatherPort::new(),
            MockGeoIpPort::new(),
            LocationPolicy::Fail,
        );

        let result = svc
            .compare_direct(&["Oslo".to_string()], UnitSystem::Metric)
            .await;
        assert!(matches!(result, Err(ApplicationError::Validation(_))));
    }

    #[tokio::test]
    async fn forecast_direct_merges_current_into_forecast() {
        let mut weather = MockWeatherPort::new();
        weather.expect_current_weather().times(1).returning(|city, _| {
            let mut r = report(city);
            r.current = Some(domain::CurrentConditions {
                temperature: 19.0,
                feels_like: 18.5,
                humidity: 60,
                pressure: 1012.0,
                visibility: 10_000,
                wind_speed: 4.0,
                wind_direction_deg: 90,
                description: "few clouds".to_string(),
                icon: "02d".to_string(),
                condition: "Clouds".to_string(),
                observed_at: chrono::Utc::now(),
            });
            Ok(r)
        });
        weather.expect_forecast().times(1).returning(|city, _, _| {
            let mut r = report(city);
            r.forecast = vec![day((2026, 8, 4)), day((2026, 8, 5))];
            Ok(r)
        });

        let svc = service(
            MockInferencePort::new(),
            weather,
            MockGeoIpPort::new(),
            LocationPolicy::Fail,
        );

        let merged = svc
            .forecast_direct("Oslo", 2, UnitSystem::Metric)
            .await
            .expect("report");
        assert!(merged.current.is_some());
        assert_eq!(merged.forecast.len(), 2);
    }

    #[tokio::test]
    async fn forecast_direct_tolerates_missing_current() {
        let mut weather = MockWeatherPort::new();
        weather.expect_current_weather().times(1).returning(|_, _| {
            Err(ApplicationError::provider(
                crate::ProviderErrorKind::Timeout,
                "timed out",
            ))
        });
        weather.expect_forecast().times(1).returning(|city, _, _| {
            let mut r = report(city);
            r.forecast = vec![day((2026, 8, 4))];
            Ok(r)
        });

        let svc = service(
            MockInferencePort::new(),
            weather,
            MockGeoIpPort::new(),
            LocationPolicy::Fail,
        );

        let merged = svc
            .forecast_direct("Oslo", 1, UnitSystem::Metric)
            .await
            .expect("report");
        assert!(merged.current.is_none());
        assert_eq!(merged.forecast.len(), 1);
    }
}
