use model::{
    geo_point::{GeoPoint, GeoPointError, Geotagged},
    WithDistance,
};
use thiserror::Error;

/// Both variants are caller contract violations (invalid arguments), there is
/// nothing to retry.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ProximityError {
    #[error("invalid argument: radius must be a finite, non-negative number of kilometers, got {0}")]
    InvalidRadius(f64),
    #[error("invalid argument: origin is malformed, {0}")]
    InvalidOrigin(GeoPointError),
}

/// "Everything within `radius_km` of `origin`", validated on construction.
///
/// A radius of zero is allowed and selects records located exactly at the
/// origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityQuery {
    origin: GeoPoint,
    radius_km: f64,
}

impl ProximityQuery {
    pub fn new(origin: GeoPoint, radius_km: f64) -> Result<Self, ProximityError> {
        origin.validate().map_err(ProximityError::InvalidOrigin)?;
        if !radius_km.is_finite() || radius_km < 0.0 {
            return Err(ProximityError::InvalidRadius(radius_km));
        }
        Ok(Self { origin, radius_km })
    }

    pub fn origin(&self) -> &GeoPoint {
        &self.origin
    }

    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    /// Distance to `record` if it lies within the radius (inclusive).
    ///
    /// Records with a malformed location are never nearby. They are reported
    /// with a warning instead of failing the whole query.
    pub fn distance_if_nearby<R: Geotagged>(&self, record: &R) -> Option<f64> {
        let location = record.location();
        if let Err(why) = location.validate() {
            log::warn!(
                "skipping record with invalid location ({}, {}): {}",
                location.latitude,
                location.longitude,
                why
            );
            return None;
        }
        let distance = self.origin.distance_to(location);
        (distance <= self.radius_km).then_some(distance)
    }

    pub fn contains<R: Geotagged>(&self, record: &R) -> bool {
        self.distance_if_nearby(record).is_some()
    }

    /// Borrows every record within the radius. Input order is kept.
    pub fn filter<'a, R: Geotagged>(&self, records: &'a [R]) -> Vec<&'a R> {
        records
            .iter()
            .filter(|record| self.contains(*record))
            .collect()
    }

    /// Same selection as `filter`, taking ownership and pairing each record
    /// with its distance.
    pub fn with_distances<R, I>(&self, records: I) -> Vec<WithDistance<R>>
    where
        R: Geotagged,
        I: IntoIterator<Item = R>,
    {
        records
            .into_iter()
            .filter_map(|record| {
                self.distance_if_nearby(&record)
                    .map(|distance| WithDistance::new(distance, record))
            })
            .collect()
    }
}

/// Returns the records whose distance from `origin` is at most `radius_km`,
/// in their original relative order.
pub fn filter_nearby<'a, R: Geotagged>(
    origin: GeoPoint,
    radius_km: f64,
    records: &'a [R],
) -> Result<Vec<&'a R>, ProximityError> {
    Ok(ProximityQuery::new(origin, radius_km)?.filter(records))
}
