use serde::{Deserialize, Serialize};

use crate::core::{AppError, AppResult};

/// Mean Earth radius used by the spherical approximation.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS84-style decimal-degree position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Builds a coordinate pair, rejecting non-finite or out-of-range values.
    pub fn new(lat: f64, lng: f64) -> AppResult<Self> {
        if !lat.is_finite() || !lng.is_finite() {
            return Err(AppError::validation("lat and lng must be finite numbers"));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(AppError::validation("lat must be between -90 and 90"));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(AppError::validation("lng must be between -180 and 180"));
        }
        Ok(Self { lat, lng })
    }

    /// Requires both components to be present, as sent by the client.
    pub fn from_parts(lat: Option<f64>, lng: Option<f64>) -> AppResult<Self> {
        match (lat, lng) {
            (Some(lat), Some(lng)) => Self::new(lat, lng),
            _ => Err(AppError::validation("lat and lng are required")),
        }
    }

    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        haversine_km(self.lat, self.lng, other.lat, other.lng)
    }
}

/// Great-circle distance in kilometres between two decimal-degree points.
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn london_to_paris() {
        let d = haversine_km(51.5074, -0.1278, 48.8566, 2.3522);
        assert!((343.0..=344.5).contains(&d), "got {d}");
    }

    #[test]
    fn same_point_is_zero() {
        assert_eq!(haversine_km(40.7128, -74.0060, 40.7128, -74.0060), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let ny = Coordinates::new(40.7128, -74.0060).unwrap();
        let la = Coordinates::new(34.0522, -118.2437).unwrap();
        let there = ny.distance_km(&la);
        let back = la.distance_km(&ny);
        assert!((there - back).abs() < 1e-9);
        assert!((3900.0..4000.0).contains(&there), "got {there}");
    }

    #[test]
    fn antipodes_are_half_the_circumference() {
        let d = haversine_km(0.0, 0.0, 0.0, 180.0);
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn rejects_out_of_range_and_non_finite() {
        assert!(Coordinates::new(90.0, 180.0).is_ok());
        assert!(Coordinates::new(-90.0, -180.0).is_ok());
        assert!(Coordinates::new(200.0, 0.0).is_err());
        assert!(Coordinates::new(0.0, -180.5).is_err());
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
        assert!(Coordinates::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn missing_component_is_rejected() {
        assert!(Coordinates::from_parts(Some(1.0), None).is_err());
        assert!(Coordinates::from_parts(None, Some(1.0)).is_err());
        assert!(Coordinates::from_parts(Some(1.0), Some(2.0)).is_ok());
    }
}
