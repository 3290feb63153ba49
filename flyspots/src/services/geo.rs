//! Great-circle distances and restricted airspace.

use serde::{Deserialize, Serialize};

use crate::models::{Coordinates, Spot};

/// Mean earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points, in kilometres.
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Copy of `spots` with `distance_km` measured from `reference`.
///
/// Spots with out-of-range coordinates get a NaN distance, which the filtering
/// engine never matches.
pub fn with_distances_from(spots: &[Spot], reference: Coordinates) -> Vec<Spot> {
    spots
        .iter()
        .map(|spot| {
            let mut spot = spot.clone();
            spot.distance_km = if spot.coordinates.is_valid() && reference.is_valid() {
                haversine_km(reference, spot.coordinates)
            } else {
                f64::NAN
            };
            spot
        })
        .collect()
}

/// Circular area where flying is not allowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoFlyZone {
    pub name: String,
    pub center: Coordinates,
    pub radius_m: f64,
}

impl NoFlyZone {
    pub fn new(name: impl Into<String>, center: Coordinates, radius_m: f64) -> Self {
        Self {
            name: name.into(),
            center,
            radius_m,
        }
    }

    /// True when `point` lies inside the zone or on its edge.
    pub fn contains(&self, point: Coordinates) -> bool {
        haversine_km(self.center, point) * 1000.0 <= self.radius_m
    }
}

/// Zones marked on the default map around Tel Aviv.
pub fn default_no_fly_zones() -> Vec<NoFlyZone> {
    vec![
        NoFlyZone::new("Ben Gurion Airport", Coordinates::new(32.0114, 34.8867), 2000.0),
        NoFlyZone::new("Military Base", Coordinates::new(32.1000, 34.8000), 1500.0),
        NoFlyZone::new("Restricted Area", Coordinates::new(32.0500, 34.7500), 1000.0),
    ]
}

/// Zones containing `point`, in the order given.
pub fn zones_containing(zones: &[NoFlyZone], point: Coordinates) -> Vec<&NoFlyZone> {
    zones.iter().filter(|zone| zone.contains(point)).collect()
}
