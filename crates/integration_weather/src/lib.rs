//! OpenWeather integration
//!
//! Client for an OpenWeather-style API: current conditions plus a
//! 3-hour-interval forecast, normalized into the domain's
//! [`WeatherReport`](domain::WeatherReport) with sub-daily samples
//! aggregated into calendar days.

mod aggregate;
pub mod client;
mod models;

pub use client::{OpenWeatherClient, WeatherConfig, WeatherError};
