//! Distance Utilities
//!
//! Two distance functions with different precision contracts:
//! - `haversine_km`: great-circle distance, used for shelter-scale ranking (~10 km)
//! - `planar_approx_km`: degree-space Euclidean × 111, used only for the coarse
//!   "within 500 km" neighbour cutoff
//!
//! They are not interchangeable. Non-finite input is the caller's problem.

use serde::{Deserialize, Serialize};

/// Mean Earth radius (km)
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometres per degree of latitude (coarse constant)
pub const KM_PER_DEGREE: f64 = 111.0;

/// Great-circle distance between two points given in degrees.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);

    // Clamp guards asin against a hair over 1.0 from rounding
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}

/// Euclidean distance in degree space scaled by 111 km/degree.
///
/// Ignores longitude convergence entirely, so it overestimates east-west
/// separation away from the equator. Fine for pre-filtering at hundreds of km.
pub fn planar_approx_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    ((lat2 - lat1).powi(2) + (lon2 - lon1).powi(2)).sqrt() * KM_PER_DEGREE
}

/// Rectangular lat/lon region used to scope a geodata query
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    /// Box of half-width `radius_km` around a point.
    ///
    /// Longitude span widens with latitude (÷ cos lat) so the box still
    /// covers the radius east-west.
    pub fn around(lat: f64, lon: f64, radius_km: f64) -> Self {
        let lat_delta = radius_km / KM_PER_DEGREE;
        let lon_delta = radius_km / (KM_PER_DEGREE * lat.to_radians().cos());

        Self {
            south: lat - lat_delta,
            west: lon - lon_delta,
            north: lat + lat_delta,
            east: lon + lon_delta,
        }
    }

    /// Overpass QL ordering: south,west,north,east
    pub fn to_overpass(&self) -> String {
        format!("{},{},{},{}", self.south, self.west, self.north, self.east)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_haversine_zero_for_identical_points() {
        assert_eq!(haversine_km(19.0760, 72.8777, 19.0760, 72.8777), 0.0);
        assert_eq!(haversine_km(-33.87, 151.21, -33.87, 151.21), 0.0);
    }

    #[test]
    fn test_haversine_symmetric() {
        let pairs = [
            ((22.5726, 88.3639), (13.0827, 80.2707)),
            ((19.0760, 72.8777), (8.5241, 76.9366)),
            ((0.0, 179.9), (0.0, -179.9)),
            ((-45.0, 10.0), (60.0, -120.0)),
        ];
        for ((a_lat, a_lon), (b_lat, b_lon)) in pairs {
            let ab = haversine_km(a_lat, a_lon, b_lat, b_lon);
            let ba = haversine_km(b_lat, b_lon, a_lat, a_lon);
            assert_relative_eq!(ab, ba, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_haversine_known_distances() {
        // One degree of latitude along a meridian
        assert_relative_eq!(haversine_km(0.0, 0.0, 1.0, 0.0), 111.195, epsilon = 0.01);

        // Mumbai -> Chennai is roughly 1030 km
        let d = haversine_km(19.0760, 72.8777, 13.0827, 80.2707);
        assert!((d - 1030.0).abs() < 15.0, "got {}", d);

        // Antimeridian crossing stays short
        let d = haversine_km(0.0, 179.9, 0.0, -179.9);
        assert!(d < 25.0, "got {}", d);
    }

    #[test]
    fn test_planar_approx() {
        assert_relative_eq!(planar_approx_km(0.0, 0.0, 3.0, 4.0), 555.0, epsilon = 1e-9);
        assert_eq!(planar_approx_km(10.0, 10.0, 10.0, 10.0), 0.0);

        // Puri -> Gopalpur: well under the 500 km neighbour cutoff
        let d = planar_approx_km(19.8135, 85.8310, 19.2876, 84.9333);
        assert!(d < 500.0);
    }

    #[test]
    fn test_bounding_box_around() {
        let bbox = BoundingBox::around(0.0, 0.0, 111.0);
        assert_relative_eq!(bbox.south, -1.0, epsilon = 1e-9);
        assert_relative_eq!(bbox.north, 1.0, epsilon = 1e-9);
        assert_relative_eq!(bbox.west, -1.0, epsilon = 1e-9);
        assert_relative_eq!(bbox.east, 1.0, epsilon = 1e-9);

        // Longitude span widens at 60°N (cos 60° = 0.5)
        let bbox = BoundingBox::around(60.0, 10.0, 111.0);
        assert_relative_eq!(bbox.east - bbox.west, 4.0, epsilon = 1e-9);
        assert_eq!(bbox.to_overpass(), format!("{},{},{},{}", bbox.south, bbox.west, bbox.north, bbox.east));
    }
}
