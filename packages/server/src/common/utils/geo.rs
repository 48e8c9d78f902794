use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mean Earth radius used for great-circle distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeoError {
    #[error("coordinates must be finite numbers (got {latitude}, {longitude})")]
    NonFinite { latitude: f64, longitude: f64 },
}

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Build a point, rejecting NaN and infinities.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        let point = Self {
            latitude,
            longitude,
        };
        point.validate()?;
        Ok(point)
    }

    pub fn validate(&self) -> Result<(), GeoError> {
        if self.latitude.is_finite() && self.longitude.is_finite() {
            Ok(())
        } else {
            Err(GeoError::NonFinite {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }

    /// Great-circle distance to `other` in kilometers.
    pub fn distance_km(&self, other: &GeoPoint) -> Result<f64, GeoError> {
        haversine_km(*self, *other)
    }
}

/// Calculate the distance between two points in kilometers
///
/// Haversine on a sphere of radius [`EARTH_RADIUS_KM`]. `sqrt(a)` is clamped
/// to 1 so rounding near antipodes cannot push `asin` out of its domain.
pub fn haversine_km(from: GeoPoint, to: GeoPoint) -> Result<f64, GeoError> {
    from.validate()?;
    to.validate()?;

    let dlat = (to.latitude - from.latitude).to_radians();
    let dlng = (to.longitude - from.longitude).to_radians();

    let a = (dlat / 2.0).sin().powi(2)
        + from.latitude.to_radians().cos()
            * to.latitude.to_radians().cos()
            * (dlng / 2.0).sin().powi(2);

    Ok(2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin())
}
