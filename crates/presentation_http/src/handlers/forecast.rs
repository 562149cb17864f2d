//! Direct forecast handler

use axum::Json;
use axum::extract::{Query, State};
use domain::{CurrentConditions, DailyForecast, WeatherSummary};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use validator::Validate;

use crate::error::ApiError;
use crate::handlers::parse_units;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Query parameters for `GET /v1/forecast`
#[derive(Debug, Deserialize, Validate)]
pub struct ForecastParams {
    /// City to forecast
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub city: String,

    /// Number of forecast days
    #[serde(default = "default_days")]
    #[validate(range(min = 1, max = 16, message = "must be 1-16"))]
    pub days: u8,

    /// Unit system
    #[serde(default)]
    pub units: Option<String>,

    /// Whether to attach an AI summary (default false)
    #[serde(default)]
    pub summary: Option<bool>,
}

const fn default_days() -> u8 {
    5
}

/// Response data for `GET /v1/forecast`
#[derive(Debug, Serialize)]
pub struct ForecastData {
    /// Current conditions, when the provider answered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<CurrentConditions>,
    /// Daily forecast entries
    pub forecast: Vec<DailyForecast>,
    /// Narrative summary, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<WeatherSummary>,
    /// City as resolved by the provider
    pub city: String,
    /// Days actually covered
    pub days: usize,
}

/// Fetch a forecast for an explicit city
///
/// GET /v1/forecast
#[instrument(skip(state))]
pub async fn get_forecast(
    State(state): State<AppState>,
    Query(params): Query<ForecastParams>,
) -> Result<Json<ApiResponse<ForecastData>>, ApiError> {
    params
        .validate()
        .map_err(|e| ApiError::from_validation(&e))?;
    let units = parse_units(params.units.as_deref())?.unwrap_or(state.config.defaults.units);

    let report = state
        .query_service
        .forecast_direct(&params.city, params.days, units)
        .await?;

    let summary = if params.summary.unwrap_or(false) {
        state.query_service.summarize(&report, &[]).await
    } else {
        None
    };

    Ok(Json(ApiResponse::success(ForecastData {
        days: report.forecast.len(),
        city: report.city.clone(),
        current: report.current,
        forecast: report.forecast,
        summary,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_validation_rejects_zero_days() {
        let params = ForecastParams {
            city: "Oslo".to_string(),
            days: 0,
            units: None,
            summary: None,
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn params_default_days() {
        let params: ForecastParams =
            serde_json::from_str(r#"{"city":"Oslo"}"#).expect("deserialize");
        assert_eq!(params.days, 5);
    }
}
