//! Shelter finder
//!
//! Turns raw geodata features around a point into a ranked list of candidate
//! emergency shelters: classify, compute distance, filter by radius, drop
//! duplicates at ~11 m resolution, sort nearest first, cap at 12.

pub mod cache;
pub mod classify;

pub use cache::ShelterCache;
pub use classify::{FacilityList, FacilityType};

use crate::error::UpstreamError;
use crate::sources::GeodataSource;
use crate::utils::{haversine_km, BoundingBox};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Upper bound on candidates returned by a single ranking
pub const MAX_SHELTERS: usize = 12;

/// Default search radius around a city (km)
pub const DEFAULT_RADIUS_KM: f64 = 10.0;

/// Center of an area feature
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCenter {
    pub lat: f64,
    pub lon: f64,
}

/// Raw geodata feature as returned by the geodata collaborator
///
/// Point features (`node`) carry `lat`/`lon`; area features (`way`) carry a
/// `center`. Either may be absent in a malformed record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoElement {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub center: Option<GeoCenter>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

impl GeoElement {
    /// Point coordinate for nodes, center coordinate for areas
    pub fn coordinate(&self) -> Option<(f64, f64)> {
        if self.kind == "node" {
            return self.lat.zip(self.lon);
        }
        self.center.map(|c| (c.lat, c.lon))
    }
}

/// A ranked shelter candidate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShelterCandidate {
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lon: f64,
    pub capacity: String,
    pub phone: String,
    pub icon: &'static str,
    #[serde(rename = "type")]
    pub facility_type: &'static str,
    pub facilities: FacilityList,
    /// Distance from the search point, rounded to 0.1 km; internal ranking key
    #[serde(skip_serializing)]
    pub distance_km: f64,
}

impl ShelterCandidate {
    /// Build a candidate from a feature with a known coordinate
    pub fn from_element(element: &GeoElement, lat: f64, lon: f64, distance_km: f64) -> Self {
        let tags = &element.tags;
        let kind = FacilityType::classify(tags);

        let name = tags
            .get("name")
            .cloned()
            .unwrap_or_else(|| format!("{} Facility", kind.display_name()));

        let phone = tags
            .get("phone")
            .cloned()
            .unwrap_or_else(|| "Contact local authorities".to_string());

        Self {
            name,
            address: classify::address(tags, lat, lon),
            lat,
            lon,
            capacity: classify::capacity(tags, kind),
            phone,
            icon: kind.icon(),
            facility_type: kind.display_name(),
            facilities: kind.facilities(),
            distance_km,
        }
    }
}

fn round_tenth(km: f64) -> f64 {
    (km * 10.0).round_ties_even() / 10.0
}

/// Rank raw features around `(lat, lon)`
///
/// Features without a coordinate are discarded. Two features whose
/// coordinates agree to four decimal places are duplicates; the first wins.
pub fn rank_shelters(elements: &[GeoElement], lat: f64, lon: f64, radius_km: f64) -> Vec<ShelterCandidate> {
    let mut seen: FxHashSet<String> = FxHashSet::default();
    let mut candidates = Vec::new();

    for element in elements {
        let Some((e_lat, e_lon)) = element.coordinate() else {
            continue;
        };

        let distance = haversine_km(lat, lon, e_lat, e_lon);
        if distance > radius_km {
            continue;
        }

        if !seen.insert(format!("{:.4},{:.4}", e_lat, e_lon)) {
            continue;
        }

        candidates.push(ShelterCandidate::from_element(element, e_lat, e_lon, round_tenth(distance)));
    }

    // Stable: equal rounded distances keep input order
    candidates.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    candidates.truncate(MAX_SHELTERS);
    candidates
}

/// Query the geodata collaborator and rank the result
pub async fn find_shelters(
    source: &dyn GeodataSource,
    lat: f64,
    lon: f64,
    radius_km: f64,
) -> Result<Vec<ShelterCandidate>, UpstreamError> {
    let bbox = BoundingBox::around(lat, lon, radius_km);
    let elements = source.shelter_elements(&bbox).await?;
    let ranked = rank_shelters(&elements, lat, lon, radius_km);

    tracing::debug!(
        "Ranked {} shelters from {} features around ({:.4}, {:.4})",
        ranked.len(),
        elements.len(),
        lat,
        lon
    );

    Ok(ranked)
}


#[cfg(test)]
mod tests {
    use super::fixtures::{node, way};
    use super::*;

    const LAT: f64 = 19.0760;
    const LON: f64 = 72.8777;

    #[test]
    fn test_coordinate_resolution() {
        assert_eq!(node(1.0, 2.0, &[]).coordinate(), Some((1.0, 2.0)));
        assert_eq!(way(3.0, 4.0, &[]).coordinate(), Some((3.0, 4.0)));

        let mut broken = node(1.0, 2.0, &[]);
        broken.lon = None;
        assert_eq!(broken.coordinate(), None);

        let mut broken = way(1.0, 2.0, &[]);
        broken.center = None;
        assert_eq!(broken.coordinate(), None);
    }

    #[test]
    fn test_deserialize_overpass_element() {
        let json = r#"{"type":"way","id":42,"center":{"lat":19.08,"lon":72.88},
                       "tags":{"amenity":"school","name":"Ward School"}}"#;
        let element: GeoElement = serde_json::from_str(json).unwrap();
        assert_eq!(element.coordinate(), Some((19.08, 72.88)));
        assert_eq!(element.tags["name"], "Ward School");

        let json = r#"{"type":"node","lat":19.0,"lon":72.0}"#;
        let element: GeoElement = serde_json::from_str(json).unwrap();
        assert!(element.tags.is_empty());
    }

    #[test]
    fn test_radius_filter_and_missing_coordinates() {
        let mut headless = way(LAT, LON, &[("amenity", "school")]);
        headless.center = None;

        let elements = vec![
            node(LAT + 0.01, LON, &[("amenity", "hospital")]),
            // ~22 km north
            node(LAT + 0.2, LON, &[("amenity", "hospital")]),
            headless,
        ];

        let ranked = rank_shelters(&elements, LAT, LON, 10.0);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].facility_type, "Hospital");
    }

    #[test]
    fn test_duplicates_first_wins() {
        let elements = vec![
            node(19.08001, 72.88, &[("name", "First")]),
            way(19.08004, 72.88002, &[("name", "Second")]),
            node(19.09, 72.88, &[("name", "Third")]),
        ];

        let ranked = rank_shelters(&elements, LAT, LON, 10.0);
        let names: Vec<&str> = ranked.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Third"]);
    }

    #[test]
    fn test_sorted_and_capped() {
        // 20 distinct points walking away from the center, given in reverse
        let elements: Vec<GeoElement> = (0..20)
            .rev()
            .map(|i| node(LAT + 0.002 * (i as f64 + 1.0), LON, &[("amenity", "school")]))
            .collect();

        let ranked = rank_shelters(&elements, LAT, LON, 10.0);
        assert_eq!(ranked.len(), MAX_SHELTERS);
        assert!(ranked.windows(2).all(|w| w[0].distance_km <= w[1].distance_km));
        assert!(ranked.iter().all(|s| s.distance_km <= 10.0));
    }

    #[test]
    fn test_candidate_defaults() {
        let ranked = rank_shelters(&[way(LAT + 0.001, LON, &[("building", "civic")])], LAT, LON, 10.0);
        let shelter = &ranked[0];

        assert_eq!(shelter.name, "Civic Building Facility");
        assert_eq!(shelter.phone, "Contact local authorities");
        assert_eq!(shelter.capacity, "100-200 people");
        assert_eq!(shelter.icon, "building");
        assert_eq!(shelter.address, format!("Near {:.4}°, {:.4}°", LAT + 0.001, LON));
    }

    #[test]
    fn test_distance_rounds_half_to_even() {
        assert_eq!(round_tenth(0.25), 0.2);
        assert_eq!(round_tenth(1.75), 1.8);
        assert_eq!(round_tenth(2.46), 2.5);
    }

    #[test]
    fn test_distance_not_serialized() {
        let ranked = rank_shelters(&[node(LAT + 0.01, LON, &[("amenity", "townhall")])], LAT, LON, 10.0);
        let json = serde_json::to_value(&ranked[0]).unwrap();

        assert!(json.get("distance_km").is_none());
        assert_eq!(json["type"], "Town Hall");
        assert_eq!(json["icon"], "landmark");
        assert_eq!(json["facilities"][2], "Meeting Rooms");
    }
}
