//! Coastal City Registry
//!
//! Fixed mapping from coast to an ordered list of (city, latitude, longitude).
//! Read-only reference data; lookups are case-insensitive by name.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coast identifier. Selects the calibration table in coast-calibrated scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Coast {
    /// Bay of Bengal side: frequent, severe cyclonic activity
    #[serde(rename = "East Coast")]
    East,

    /// Arabian Sea side: lower sensitivity
    #[serde(rename = "West Coast")]
    West,
}

impl Coast {
    /// Friendly name for display
    pub fn display_name(&self) -> &'static str {
        match self {
            Coast::East => "East Coast",
            Coast::West => "West Coast",
        }
    }

    /// Get all coasts in registry order
    pub fn all() -> &'static [Coast] {
        &[Coast::East, Coast::West]
    }
}

impl fmt::Display for Coast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A known coastal city
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoastalCity {
    pub name: &'static str,
    pub coast: Coast,
    pub lat: f64,
    pub lon: f64,
}

// ============================================================================
// Embedded registry data
// ============================================================================

static EAST_COAST: &[(&str, f64, f64)] = &[
    ("Kolkata", 22.5726, 88.3639),
    ("Chennai", 13.0827, 80.2707),
    ("Visakhapatnam", 17.6868, 83.2185),
    ("Paradip", 20.2587, 86.6044),
    ("Puri", 19.8135, 85.8310),
    ("Gopalpur", 19.2876, 84.9333),
    ("Digha", 21.6275, 87.5212),
    ("Balasore", 21.4930, 86.9301),
    ("Pondicherry", 11.9416, 79.8083),
];

static WEST_COAST: &[(&str, f64, f64)] = &[
    ("Mumbai", 19.0760, 72.8777),
    ("Surat", 21.1702, 72.8311),
    ("Goa", 15.2993, 74.1240),
    ("Mangalore", 12.9141, 74.8560),
    ("Kochi", 9.9312, 76.2673),
    ("Kozhikode", 11.2588, 75.7804),
    ("Kannur", 11.8745, 75.3704),
    ("Karwar", 14.7992, 74.1305),
    ("Thiruvananthapuram", 8.5241, 76.9366),
];

/// City registry with a lowercase-name index
#[derive(Debug, Clone)]
pub struct CityRegistry {
    cities: Vec<CoastalCity>,
    by_name: FxHashMap<String, usize>,
}

impl CityRegistry {
    /// Build a registry from explicit entries (registry order is preserved)
    pub fn new(cities: Vec<CoastalCity>) -> Self {
        let mut by_name = FxHashMap::default();
        for (idx, city) in cities.iter().enumerate() {
            // First entry wins if a name is repeated
            by_name.entry(city.name.to_lowercase()).or_insert(idx);
        }
        Self { cities, by_name }
    }

    /// The built-in Indian coastal registry (East Coast first, then West Coast)
    pub fn coastal_india() -> Self {
        let east = EAST_COAST.iter().map(|&(name, lat, lon)| CoastalCity { name, coast: Coast::East, lat, lon });
        let west = WEST_COAST.iter().map(|&(name, lat, lon)| CoastalCity { name, coast: Coast::West, lat, lon });
        Self::new(east.chain(west).collect())
    }

    /// Case-insensitive lookup by city name
    pub fn find(&self, name: &str) -> Option<&CoastalCity> {
        self.by_name
            .get(&name.trim().to_lowercase())
            .map(|&idx| &self.cities[idx])
    }

    /// All cities in registry order
    pub fn all(&self) -> &[CoastalCity] {
        &self.cities
    }

    /// Cities on one coast, in registry order
    pub fn on_coast(&self, coast: Coast) -> impl Iterator<Item = &CoastalCity> {
        self.cities.iter().filter(move |c| c.coast == coast)
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}

impl Default for CityRegistry {
    fn default() -> Self {
        Self::coastal_india()
    }
}
