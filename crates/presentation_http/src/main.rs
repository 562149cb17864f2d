//! Nimbus HTTP server
//!
//! Main entry point for the HTTP API.

use std::sync::Arc;

use application::{LocationPolicy, QueryService};
use infrastructure::{
    AppConfig, IpApiGeoIpAdapter, OllamaInferenceAdapter, OpenWeatherAdapter,
};
use presentation_http::{routes, state::AppState};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nimbus_server=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("🌦️  Nimbus v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {e}"))?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    info!(
        host = %config.server.host,
        port = config.server.port,
        model = %config.inference.model,
        default_units = %config.defaults.units,
        "Configuration loaded"
    );

    // Wire ports to adapters; retry policy is shared across all of them
    let inference = OllamaInferenceAdapter::new(config.inference.clone(), config.retry)
        .map_err(|e| anyhow::anyhow!("Failed to initialize inference: {e}"))?;
    let weather = OpenWeatherAdapter::new(config.weather.clone(), config.retry)
        .map_err(|e| anyhow::anyhow!("Failed to initialize weather client: {e}"))?;
    let geoip = IpApiGeoIpAdapter::new(config.geoip.clone(), config.retry)
        .map_err(|e| anyhow::anyhow!("Failed to initialize geolocation client: {e}"))?;

    // The HTTP surface keeps queries alive when geolocation fails by
    // substituting the configured default city; the CLI does not.
    let query_service = QueryService::new(
        Arc::new(inference),
        Arc::new(weather),
        Arc::new(geoip),
        config.defaults.units,
        LocationPolicy::Default(config.defaults.city.clone()),
    );

    let state = AppState {
        query_service: Arc::new(query_service),
        config: Arc::new(config.clone()),
    };

    let app = routes::create_router(state);

    let cors_layer = if config.server.allowed_origins.is_empty() {
        // Development mode: allow all origins
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use axum::http::{HeaderValue, Method};
        let origins: Vec<HeaderValue> = config
            .server
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any)
    };

    let app = app.layer(TraceLayer::new_for_http()).layer(cors_layer);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;

    info!("🚀 Server listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server shutdown complete");
    Ok(())
}

/// Resolve when the process should shut down
async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut sigterm) = signal::unix::signal(signal::unix::SignalKind::terminate()) {
            sigterm.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
