//! Ports - interfaces the application layer depends on

mod geoip_port;
mod inference_port;
mod weather_port;

pub use geoip_port::{GeoIpPort, GeoLocation};
pub use inference_port::{InferencePort, InferenceResult};
pub use weather_port::WeatherPort;

#[cfg(test)]
pub use geoip_port::MockGeoIpPort;
#[cfg(test)]
pub use inference_port::MockInferencePort;
#[cfg(test)]
pub use weather_port::MockWeatherPort;
