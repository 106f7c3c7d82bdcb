use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utility::geo;

use crate::ExampleData;

pub const MIN_LATITUDE: f64 = -90.0;
pub const MAX_LATITUDE: f64 = 90.0;
pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeoPointError {
    #[error("latitude {0} is outside of [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} is outside of [-180, 180]")]
    LongitudeOutOfRange(f64),
}

/// A WGS84 coordinate in decimal degrees.
///
/// Values read from the record store are not trusted, which is why the
/// fields are public and a point may exist in an invalid state. Use
/// [`GeoPoint::new`] for input that should be rejected early and
/// [`GeoPoint::validate`] before relying on a stored point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoPointError> {
        let point = Self::new_unchecked(latitude, longitude);
        point.validate()?;
        Ok(point)
    }

    pub const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn validate(&self) -> Result<(), GeoPointError> {
        // written as negated range checks so NaN is rejected too
        if !(MIN_LATITUDE..=MAX_LATITUDE).contains(&self.latitude) {
            return Err(GeoPointError::LatitudeOutOfRange(self.latitude));
        }
        if !(MIN_LONGITUDE..=MAX_LONGITUDE).contains(&self.longitude) {
            return Err(GeoPointError::LongitudeOutOfRange(self.longitude));
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Haversine distance in kilometers.
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        geo::haversine_distance(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }

    /// Moves the point by the given amount of degrees. The result is not
    /// validated.
    pub fn offset(&self, latitude: f64, longitude: f64) -> Self {
        Self::new_unchecked(self.latitude + latitude, self.longitude + longitude)
    }
}

impl ExampleData for GeoPoint {
    fn example_data() -> Self {
        // Rucker Park, NYC
        Self::new_unchecked(40.7580, -73.9855)
    }
}

/// Anything that can be placed on the map.
pub trait Geotagged {
    fn location(&self) -> &GeoPoint;
}

impl Geotagged for GeoPoint {
    fn location(&self) -> &GeoPoint {
        self
    }
}

impl<T: Geotagged + ?Sized> Geotagged for &T {
    fn location(&self) -> &GeoPoint {
        (**self).location()
    }
}
