//! Adapters implementing the application ports
//!
//! Each adapter wraps one integration client, applies the shared retry
//! policy at the call site, and widens integration errors into
//! [`application::ApplicationError`].

mod geoip_adapter;
mod inference_adapter;
mod weather_adapter;

pub use geoip_adapter::IpApiGeoIpAdapter;
pub use inference_adapter::OllamaInferenceAdapter;
pub use weather_adapter::OpenWeatherAdapter;
