//! Application state shared across handlers

use std::sync::Arc;

use application::QueryService;
use infrastructure::AppConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Query orchestrator used by every weather endpoint
    pub query_service: Arc<QueryService>,
    /// Application configuration
    pub config: Arc<AppConfig>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("query_service", &"<QueryService>")
            .finish_non_exhaustive()
    }
}
