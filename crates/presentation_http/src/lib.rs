//! HTTP API surface for Nimbus
//!
//! Thin axum layer over the application's query service: request
//! validation, the shared response envelope, and error-to-status
//! mapping live here; everything with behavior lives below.

pub mod error;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use response::ApiResponse;
pub use state::AppState;
