//! IP geolocation integration
//!
//! Resolves the caller's public IP address to a city-level location via
//! an ip-api-style JSON endpoint. No API key required.

pub mod client;

pub use client::{GeoIpClient, GeoIpConfig, GeoIpError, IpLocation};
