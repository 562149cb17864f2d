//! Route definitions

use axum::Router;
use axum::routing::{get, post};

use crate::handlers;
use crate::state::AppState;

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoint
        .route("/health", get(handlers::health::health_check))
        // Weather API (v1)
        .route("/v1/weather", post(handlers::weather::query_weather))
        .route("/v1/forecast", get(handlers::forecast::get_forecast))
        .route("/v1/compare", post(handlers::compare::compare_weather))
        .route("/v1/location", get(handlers::location::get_location))
        // Attach state
        .with_state(state)
}
