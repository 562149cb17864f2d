//! Multi-city comparison handler

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

/// Request body for `POST /v1/compare`
#[derive(Debug, Deserialize, Validate)]
pub struct CompareRequest {
    /// Cities to compare (at least two)
    #[validate(length(min = 2, message = "at least two cities are required"))]
    pub cities: Vec<String>,

    /// Unit system
    #[serde(default)]
    pub units: Option<String>,

    /// Whether to attach an AI summary of the first city (default false)
    #[serde(default)]
    pub summary: Option<bool>,
}

/// Response data for `POST /v1/compare`
#[derive(Debug, Serialize)]
pub struct CompareData {
    /// One report per city that resolved, in request order
    pub cities: Vec<WeatherReport>,
    /// Narrative summary of the first resolved city, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<WeatherSummary>,
    /// Names of the cities that resolved
    pub compared_cities: Vec<String>,
}

/// Compare current weather across cities
///
/// POST /v1/compare
#[instrument(skip(state, request), fields(city_count = request.cities.len()))]
pub async fn compare_weather(
    State(state): State<AppState>,
    Json(request): Json<CompareRequest>,
) -> Result<Json<ApiResponse<CompareData>>, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::from_validation(&e))?;
    let units = parse_units(request.units.as_deref())?.unwrap_or(state.config.defaults.units);

    let reports = state
        .query_service
        .compare_direct(&request.cities, units)
        .await?;

    let summary = match (request.summary.unwrap_or(false), reports.first()) {
        (true, Some(first)) => state.query_service.summarize(first, &[]).await,
        _ => None,
    };

    let compared_cities = reports.iter().map(|r| r.city.clone()).collect();

    Ok(Json(ApiResponse::success(CompareData {
        cities: reports,
        summary,
        compared_cities,
    })))
}
