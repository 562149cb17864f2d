//! IP geolocation handler

use application::ports::GeoLocation;
use axum::Json;
use axum::extract::State;
use tracing::instrument;

use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Resolve the caller's location from its IP
///
/// GET /v1/location
#[instrument(skip(state))]
pub async fn get_location(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<GeoLocation>>, ApiError> {
    let location = state.query_service.locate().await?;
    Ok(Json(ApiResponse::success(location)))
}
