//! Nimbus CLI
//!
//! Ask about the weather in plain language from the terminal.

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod render;

use std::sync::Arc;

use application::{LocationPolicy, QueryService};
use clap::Parser;
use domain::UnitSystem;
use infrastructure::{
    AppConfig, IpApiGeoIpAdapter, OllamaInferenceAdapter, OpenWeatherAdapter,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Nimbus - natural language weather
#[derive(Parser)]
#[command(name = "nimbus")]
#[command(version, about = "Ask about the weather in plain language", long_about = None)]
struct Cli {
    /// The weather question ("will it rain tomorrow in Berlin?")
    query: String,

    /// Unit system (metric or imperial); overrides the configured default
    #[arg(short, long)]
    units: Option<UnitSystem>,

    /// Skip the AI summary
    #[arg(long)]
    no_summary: bool,

    /// Verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(log_filter_from_verbosity(
            cli.verbose,
        )))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config, using defaults: {e}");
        AppConfig::default()
    });
    if let Err(e) = config.validate() {
        eprintln!("{}", render::render_error(&e.to_string()));
        std::process::exit(1);
    }

    let query_service = match build_service(&config, cli.units) {
        Ok(service) => service,
        Err(e) => {
            eprintln!("{}", render::render_error(&e.to_string()));
            std::process::exit(1);
        },
    };

    match query_service.process(&cli.query, !cli.no_summary).await {
        Ok(response) => {
            print!("{}", render::render_response(&response));
        },
        Err(e) => {
            // One red line always; the full chain only when asked for
            eprintln!("{}", render::render_error(&e.to_string()));
            if cli.verbose >= 2 {
                eprintln!("{e:?}");
            }
            std::process::exit(1);
        },
    }

    Ok(())
}

/// Wire adapters and build the query service
///
/// Unlike the HTTP surface, the CLI fails geolocation loudly instead of
/// silently answering for a default city.
fn build_service(
    config: &AppConfig,
    units_override: Option<UnitSystem>,
) -> anyhow::Result<QueryService> {
    let inference = OllamaInferenceAdapter::new(config.inference.clone(), config.retry)
        .map_err(|e| anyhow::anyhow!("Failed to initialize inference: {e}"))?;
    let weather = OpenWeatherAdapter::new(config.weather.clone(), config.retry)
        .map_err(|e| anyhow::anyhow!("Failed to initialize weather client: {e}"))?;
    let geoip = IpApiGeoIpAdapter::new(config.geoip.clone(), config.retry)
        .map_err(|e| anyhow::anyhow!("Failed to initialize geolocation client: {e}"))?;

    Ok(QueryService::new(
        Arc::new(inference),
        Arc::new(weather),
        Arc::new(geoip),
        units_override.unwrap_or(config.defaults.units),
        LocationPolicy::Fail,
    ))
}
