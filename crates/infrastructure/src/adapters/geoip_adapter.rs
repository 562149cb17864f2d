//! Geolocation port adapter over the ip-api client

use application::ApplicationError;
use application::ports::{GeoIpPort, GeoLocation};
use async_trait::async_trait;
use domain::Coordinates;
use integration_geoip::{GeoIpClient, GeoIpConfig, GeoIpError, IpLocation};

use crate::retry::{RetryConfig, retry};

/// [`GeoIpPort`] implementation backed by [`GeoIpClient`]
#[derive(Debug)]
pub struct IpApiGeoIpAdapter {
    client: GeoIpClient,
    retry: RetryConfig,
}

impl IpApiGeoIpAdapter {
    /// Create the adapter
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: GeoIpConfig, retry: RetryConfig) -> Result<Self, GeoIpError> {
        Ok(Self {
            client: GeoIpClient::new(config)?,
            retry,
        })
    }
}

/// Convert the wire location, validating coordinates on the way in
fn into_geo_location(location: IpLocation) -> Result<GeoLocation, ApplicationError> {
    let coordinates = Coordinates::new(location.latitude, location.longitude)
        .map_err(|e| ApplicationError::GeoIp(e.to_string()))?;

    Ok(GeoLocation {
        city: location.city,
        country: location.country,
        region: location.region,
        coordinates,
        timezone: location.timezone,
    })
}

#[async_trait]
impl GeoIpPort for IpApiGeoIpAdapter {
    async fn current_location(&self) -> Result<GeoLocation, ApplicationError> {
        let location = retry(&self.retry, || self.client.lookup())
            .await
            .map_err(|e| ApplicationError::GeoIp(e.to_string()))?;

        into_geo_location(location)
    }
}
