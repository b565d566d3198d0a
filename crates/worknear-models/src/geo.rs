//! GeoJSON point type for worker locations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coordinates outside the valid latitude/longitude range.
#[derive(Debug, Error)]
#[error("coordinates out of range: longitude {longitude}, latitude {latitude}")]
pub struct InvalidCoordinates {
    pub longitude: f64,
    pub latitude: f64,
}

/// A GeoJSON point, stored with coordinates ordered `[longitude, latitude]`.
///
/// The coordinate order matters: MongoDB's 2dsphere index expects GeoJSON
/// order, which is the reverse of the latitude-first order most APIs accept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "type")]
    pub kind: String,
    /// `[longitude, latitude]`
    pub coordinates: [f64; 2],
}

impl GeoPoint {
    /// Build a point, validating the coordinate ranges.
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, InvalidCoordinates> {
        if !(-180.0..=180.0).contains(&longitude)
            || !(-90.0..=90.0).contains(&latitude)
            || longitude.is_nan()
            || latitude.is_nan()
        {
            return Err(InvalidCoordinates {
                longitude,
                latitude,
            });
        }
        Ok(Self {
            kind: "Point".to_string(),
            coordinates: [longitude, latitude],
        })
    }

    pub fn longitude(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn latitude(&self) -> f64 {
        self.coordinates[1]
    }
}
