//! Free-text weather query handler

use axum::Json;
use axum::extract::State;
use domain::{WeatherReport, WeatherSummary};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use validator::Validate;

use crate::error::ApiError;
use crate::handlers::parse_units;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Request body for `POST /v1/weather`
#[derive(Debug, Deserialize, Validate)]
pub struct WeatherRequest {
    /// Free-text query ("will it rain tomorrow in Berlin?")
    #[validate(length(min = 1, max = 500, message = "must be 1-500 characters"))]
    pub query: String,

    /// Default unit system for this request
    #[serde(default)]
    pub units: Option<String>,

    /// Whether to attach an AI summary (default true)
    #[serde(default)]
    pub summary: Option<bool>,
}

/// Response data for `POST /v1/weather`
#[derive(Debug, Serialize)]
pub struct WeatherData {
    /// One report per resolved city, in request order
    pub weather: Vec<WeatherReport>,
    /// Narrative summary, when requested and derivable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<WeatherSummary>,
    /// The original query
    pub query: String,
    /// The city the answer is about (first resolved city)
    pub location: String,
}

/// Answer a natural-language weather query
///
/// POST /v1/weather
#[instrument(skip(state, request))]
pub async fn query_weather(
    State(state): State<AppState>,
    Json(request): Json<WeatherRequest>,
) -> Result<Json<ApiResponse<WeatherData>>, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::from_validation(&e))?;
    let units = parse_units(request.units.as_deref())?;
    let with_summary = request.summary.unwrap_or(true);

    let response = state
        .query_service
        .process_with(&request.query, units, with_summary)
        .await?;

    let location = response
        .reports
        .first()
        .map(|r| r.city.clone())
        .unwrap_or_default();

    Ok(Json(ApiResponse::success(WeatherData {
        weather: response.reports,
        summary: response.summary,
        query: request.query,
        location,
    })))
}
