//! Wire types for the OpenWeather API
//!
//! Raw response shapes, private to this crate; everything public leaves
//! as a normalized [`domain::WeatherReport`].

use serde::Deserialize;

/// One weather condition entry
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ConditionEntry {
    /// Condition group ("Rain", "Clear", ...)
    pub main: String,
    /// Human-readable detail ("light rain")
    pub description: String,
    /// Icon id ("10d")
    pub icon: String,
}

/// Temperature/humidity/pressure block
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct MainData {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub pressure: f64,
}

/// Wind block
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WindData {
    pub speed: f64,
    #[serde(default)]
    pub deg: Option<u16>,
}

/// Country holder on the current-weather response
#[derive(Debug, Clone, Deserialize, Default)]
pub(crate) struct SysInfo {
    #[serde(default)]
    pub country: Option<String>,
}

/// Raw current-weather response
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CurrentResponse {
    pub name: String,
    #[serde(default)]
    pub sys: SysInfo,
    pub main: MainData,
    pub weather: Vec<ConditionEntry>,
    pub wind: WindData,
    #[serde(default)]
    pub visibility: Option<u32>,
    pub dt: i64,
}

/// One 3-hour forecast sample
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ForecastSample {
    pub dt: i64,
    pub main: MainData,
    pub weather: Vec<ConditionEntry>,
    pub wind: WindData,
    /// Precipitation probability, 0.0-1.0
    #[serde(default)]
    pub pop: Option<f64>,
}

/// City block on the forecast response
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CityInfo {
    pub name: String,
    #[serde(default)]
    pub country: String,
}

/// Raw forecast response
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ForecastResponse {
    pub city: CityInfo,
    pub list: Vec<ForecastSample>,
}
