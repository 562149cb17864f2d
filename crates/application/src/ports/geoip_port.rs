//! Geolocation port
//!
//! Resolves the caller's public IP address to a city-level location.

use async_trait::async_trait;
use domain::Coordinates;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// A resolved IP-based location
///
/// Providers that omit the city, country, or coordinates produce an
/// error, never a partial value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    /// Resolved city name
    pub city: String,
    /// Country name or code
    pub country: String,
    /// Region/state name
    pub region: String,
    /// Validated coordinates
    pub coordinates: Coordinates,
    /// IANA timezone name
    pub timezone: String,
}

/// Port for IP geolocation
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeoIpPort: Send + Sync {
    /// Resolve the current public IP to a location
    async fn current_location(&self) -> Result<GeoLocation, ApplicationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn GeoIpPort>();
    }

    #[test]
    fn geo_location_serde_round_trip() {
        let location = GeoLocation {
            city: "Berlin".to_string(),
            country: "Germany".to_string(),
            region: "Berlin".to_string(),
            coordinates: Coordinates::new(52.52, 13.405).expect("valid"),
            timezone: "Europe/Berlin".to_string(),
        };
        let json = serde_json::to_string(&location).expect("serialize");
        let parsed: GeoLocation = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(location, parsed);
    }
}
