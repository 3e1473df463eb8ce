//! Nearest-zone lookup and the drop-off geofence check.

use serde::{Deserialize, Serialize};

use crate::error::RideError;
use crate::geo::{distance_km, Coordinate};
use crate::zones::{Zone, ZoneRegistry};

/// Drop-off radius around a zone, in meters (inclusive).
pub const GEOFENCE_RADIUS_METERS: f64 = 50.0;

/// Closest zone to a point and how far away it is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearestZone {
    pub zone: Zone,
    pub distance_meters: f64,
}

/// How a drop-off location was judged at settlement.
///
/// The simulated override is reported separately so it is never mistaken
/// for a genuine geofence match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParkingVerdict {
    WithinGeofence,
    SimulatedOverride,
    OutsideGeofence,
}

impl ParkingVerdict {
    pub fn is_designated(self) -> bool {
        !matches!(self, ParkingVerdict::OutsideGeofence)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeofenceResolver {
    pub radius_meters: f64,
}

impl Default for GeofenceResolver {
    fn default() -> Self {
        Self {
            radius_meters: GEOFENCE_RADIUS_METERS,
        }
    }
}

impl GeofenceResolver {
    pub fn new(radius_meters: f64) -> Self {
        Self { radius_meters }
    }

    /// True when the override is set or the distance is within the radius.
    pub fn is_at_designated_zone(&self, distance_meters: f64, simulated_override: bool) -> bool {
        simulated_override || distance_meters <= self.radius_meters
    }

    /// Classify a drop-off. An override is always reported as such, even
    /// when the simulated move put the bike inside the radius.
    pub fn verdict(&self, distance_meters: f64, simulated_override: bool) -> ParkingVerdict {
        if simulated_override {
            ParkingVerdict::SimulatedOverride
        } else if distance_meters <= self.radius_meters {
            ParkingVerdict::WithinGeofence
        } else {
            ParkingVerdict::OutsideGeofence
        }
    }

    pub fn nearest(&self, registry: &ZoneRegistry, point: Coordinate) -> Result<NearestZone, RideError> {
        nearest_zone(registry.all(), point)
    }
}

/// Find the closest zone to `point`.
///
/// Later zones replace the current best only when strictly closer, so the
/// first zone in declaration order wins ties.
pub fn nearest_zone(zones: &[Zone], point: Coordinate) -> Result<NearestZone, RideError> {
    let mut best: Option<(&Zone, f64)> = None;

    for zone in zones {
        let km = distance_km(point, zone.location);
        let closer = match best {
            Some((_, best_km)) => km < best_km,
            None => true,
        };
        if closer {
            best = Some((zone, km));
        }
    }

    let (zone, km) = best.ok_or(RideError::EmptyRegistry)?;
    Ok(NearestZone {
        zone: zone.clone(),
        distance_meters: km * 1000.0,
    })
}
