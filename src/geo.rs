//! Great-circle distance between simulated coordinates.
//!
//! Coordinates are injected by the host (no positioning sensor), so no
//! range validation happens here.

use serde::{Deserialize, Serialize};

/// Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6373.0;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Move by a number of meters north and east (flat-earth approximation).
    ///
    /// Used to simulate the bike drifting away from where it was unlocked.
    pub fn offset_meters(&self, north_m: f64, east_m: f64) -> Self {
        let meters_per_degree = EARTH_RADIUS_KM * 1000.0 * std::f64::consts::PI / 180.0;
        let d_lat = north_m / meters_per_degree;
        let d_lng = east_m / (meters_per_degree * self.latitude.to_radians().cos());
        Self::new(self.latitude + d_lat, self.longitude + d_lng)
    }

    pub fn distance_km(&self, other: &Coordinate) -> f64 {
        distance_km(*self, *other)
    }
}

/// Haversine distance between two points in kilometers.
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1_rad = a.latitude.to_radians();
    let lat2_rad = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lng = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}
