//! HTTP request handlers

pub mod compare;
pub mod forecast;
pub mod health;
pub mod location;
pub mod weather;

use domain::UnitSystem;

use crate::error::ApiError;

/// Parse an optional `units` string from a request
pub(crate) fn parse_units(units: Option<&str>) -> Result<Option<UnitSystem>, ApiError> {
    units
        .map(|value| {
            value
                .parse::<UnitSystem>()
                .map_err(|e| ApiError::BadRequest(e.to_string()))
        })
        .transpose()
}
