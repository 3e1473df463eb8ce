//! Designated parking zones on campus.

use serde::{Deserialize, Serialize};

use crate::error::RideError;
use crate::geo::Coordinate;

/// Campus center, the simulated location before any ride starts.
pub const CAMPUS_CENTER: Coordinate = Coordinate::new(3.0740, 101.4980);

const CAMPUS_ZONES: &[(u32, &str, f64, f64)] = &[
    (1, "Hentian Mawar (Dc)", 3.0725, 101.5005),
    (2, "Hentian Pusat Kesihatan", 3.0735, 101.5020),
    (3, "Hentian Anggerik", 3.0745, 101.5035),
    (4, "Hentian Perindu", 3.0755, 101.5050),
    (5, "Hentian Seroja", 3.0765, 101.5065),
    (6, "Hentian Fskm", 3.0715, 101.5080),
    (7, "Hentian Fkpm (Mascom)", 3.0705, 101.5095),
];

/// A designated point where rentals may start or legally end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: u32,
    pub name: String,
    pub location: Coordinate,
}

impl Zone {
    pub fn new(id: u32, name: impl Into<String>, location: Coordinate) -> Self {
        Self {
            id,
            name: name.into(),
            location,
        }
    }
}

/// Ordered, read-only catalog of zones.
///
/// Declaration order is preserved: it drives listing, default selection
/// and the nearest-zone tie-break.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneRegistry {
    zones: Vec<Zone>,
}

impl ZoneRegistry {
    /// Build a registry from configured zones. An empty list is a
    /// configuration error.
    pub fn new(zones: Vec<Zone>) -> Result<Self, RideError> {
        if zones.is_empty() {
            return Err(RideError::EmptyRegistry);
        }
        Ok(Self { zones })
    }

    /// The built-in seven campus stops.
    pub fn campus() -> Self {
        let zones = CAMPUS_ZONES
            .iter()
            .map(|&(id, name, lat, lng)| Zone::new(id, name, Coordinate::new(lat, lng)))
            .collect();
        Self { zones }
    }

    pub fn all(&self) -> &[Zone] {
        &self.zones
    }

    /// First declared zone, used as the default selection.
    pub fn first(&self) -> &Zone {
        // Non-empty by construction.
        &self.zones[0]
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Zone> {
        self.zones.iter().find(|zone| zone.name == name)
    }

    pub fn resolve(&self, name: &str) -> Result<&Zone, RideError> {
        self.find_by_name(name)
            .ok_or_else(|| RideError::ZoneNotFound(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

impl Default for ZoneRegistry {
    fn default() -> Self {
        Self::campus()
    }
}
