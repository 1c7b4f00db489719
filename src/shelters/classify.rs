//! Facility classification lookup tables
//!
//! Maps OpenStreetMap `amenity` / `building` tags to a facility type, and each
//! type to its display icon, estimated capacity and amenity list.

use serde::Serialize;
use smallvec::SmallVec;
use std::collections::HashMap;

/// Facility type of a candidate shelter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FacilityType {
    Hospital,
    School,
    CommunityCenter,
    SocialFacility,
    ReligiousCenter,
    TownHall,
    /// `building=civic` without a recognised amenity
    CivicBuilding,
    /// Anything else the geodata query returned
    EmergencyShelter,
}

/// amenity tag value → type, checked before the civic-building fallback
static AMENITY_TYPES: &[(&str, FacilityType)] = &[
    ("hospital", FacilityType::Hospital),
    ("school", FacilityType::School),
    ("community_centre", FacilityType::CommunityCenter),
    ("social_facility", FacilityType::SocialFacility),
    ("place_of_worship", FacilityType::ReligiousCenter),
    ("townhall", FacilityType::TownHall),
];

/// Amenities every shelter is assumed to offer
pub const BASE_FACILITIES: [&str; 2] = ["Shelter", "Emergency Services"];

/// Base amenities plus up to three type-specific ones
pub type FacilityList = SmallVec<[&'static str; 5]>;

impl FacilityType {
    /// Classify from a tag mapping
    pub fn classify(tags: &HashMap<String, String>) -> Self {
        let amenity = tags.get("amenity").map(String::as_str).unwrap_or("building");

        if let Some(&(_, kind)) = AMENITY_TYPES.iter().find(|(tag, _)| *tag == amenity) {
            return kind;
        }

        if tags.get("building").map(String::as_str) == Some("civic") {
            return FacilityType::CivicBuilding;
        }

        FacilityType::EmergencyShelter
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FacilityType::Hospital => "Hospital",
            FacilityType::School => "School",
            FacilityType::CommunityCenter => "Community Center",
            FacilityType::SocialFacility => "Social Facility",
            FacilityType::ReligiousCenter => "Religious Center",
            FacilityType::TownHall => "Town Hall",
            FacilityType::CivicBuilding => "Civic Building",
            FacilityType::EmergencyShelter => "Emergency Shelter",
        }
    }

    /// Icon name for the presentation layer
    pub fn icon(&self) -> &'static str {
        match self {
            FacilityType::Hospital => "hospital",
            FacilityType::School => "school",
            FacilityType::CommunityCenter => "building",
            FacilityType::SocialFacility => "hands-helping",
            FacilityType::ReligiousCenter => "church",
            FacilityType::TownHall => "landmark",
            FacilityType::CivicBuilding => "building",
            FacilityType::EmergencyShelter => "home",
        }
    }

    /// Estimated capacity when the tags declare none
    pub fn estimated_capacity(&self) -> &'static str {
        match self {
            FacilityType::Hospital => "200-500 people",
            FacilityType::School => "300-800 people",
            FacilityType::CommunityCenter => "150-400 people",
            FacilityType::ReligiousCenter => "100-300 people",
            FacilityType::TownHall => "100-250 people",
            FacilityType::SocialFacility => "50-150 people",
            FacilityType::CivicBuilding | FacilityType::EmergencyShelter => "100-200 people",
        }
    }

    fn specific_facilities(&self) -> &'static [&'static str] {
        match self {
            FacilityType::Hospital => &["Medical Care", "Emergency Room", "Doctors"],
            FacilityType::School => &["Large Space", "Toilets", "Kitchen"],
            FacilityType::CommunityCenter => &["Meeting Rooms", "Kitchen", "Toilets"],
            FacilityType::ReligiousCenter => &["Large Hall", "Kitchen", "Parking"],
            FacilityType::TownHall => &["Meeting Rooms", "Offices", "Parking"],
            FacilityType::SocialFacility => &["Support Services", "Counseling", "Aid"],
            FacilityType::CivicBuilding | FacilityType::EmergencyShelter => &["Basic Amenities"],
        }
    }

    /// Base amenities followed by at most three type-specific ones
    pub fn facilities(&self) -> FacilityList {
        let mut list: FacilityList = BASE_FACILITIES.iter().copied().collect();
        list.extend(self.specific_facilities().iter().copied().take(3));
        list
    }
}

/// Capacity from tags: `capacity` → "N people", else `beds` → "N beds", else estimate
pub fn capacity(tags: &HashMap<String, String>, kind: FacilityType) -> String {
    if let Some(capacity) = tags.get("capacity") {
        return format!("{} people", capacity);
    }
    if let Some(beds) = tags.get("beds") {
        return format!("{} beds", beds);
    }
    kind.estimated_capacity().to_string()
}

/// Address from street / house number / city (or suburb) tags, else coordinates
pub fn address(tags: &HashMap<String, String>, lat: f64, lon: f64) -> String {
    let mut parts = Vec::new();

    if let Some(street) = tags.get("addr:street") {
        match tags.get("addr:housenumber") {
            Some(number) => parts.push(format!("{} {}", number, street)),
            None => parts.push(street.clone()),
        }
    }

    if let Some(locality) = tags.get("addr:city").or_else(|| tags.get("addr:suburb")) {
        parts.push(locality.clone());
    }

    if parts.is_empty() {
        format!("Near {:.4}°, {:.4}°", lat, lon)
    } else {
        parts.join(", ")
    }
}
