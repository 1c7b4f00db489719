//! Nearby-risk ranker
//!
//! Scores every other registry city within a planar 500 km of the target with
//! additive scoring and keeps the five nearest. Neighbours are fetched
//! concurrently; a neighbour whose weather fetch fails is skipped and counted.

use crate::registry::{CityRegistry, CoastalCity};
use crate::scoring::{score_additive, RiskTier};
use crate::sources::WeatherSource;
use crate::utils::planar_approx_km;
use futures::future::join_all;
use serde::Serialize;

/// Neighbour cut-off (planar km, exclusive)
pub const NEARBY_RADIUS_KM: f64 = 500.0;

/// Neighbours kept after sorting
pub const MAX_NEARBY: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyRisk {
    pub city: &'static str,
    pub lat: f64,
    pub lon: f64,
    pub probability: u8,
    pub risk_level: RiskTier,
    /// Planar distance, whole km
    pub distance: u32,
    pub alert_color: &'static str,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NearbyRanking {
    pub entries: Vec<NearbyRisk>,
    /// Neighbours inside the radius that were fetched
    pub evaluated: usize,
    /// Neighbours skipped because their weather fetch failed
    pub failed: usize,
}

/// Every other registry city inside the radius with its rounded distance, registry order
pub fn neighbours<'a>(registry: &'a CityRegistry, target: &CoastalCity) -> Vec<(&'a CoastalCity, u32)> {
    registry
        .all()
        .iter()
        .filter(|city| city.name != target.name)
        .filter_map(|city| {
            let distance = planar_approx_km(target.lat, target.lon, city.lat, city.lon);
            (distance < NEARBY_RADIUS_KM).then(|| (city, distance.round_ties_even() as u32))
        })
        .collect()
}

pub async fn rank_nearby(registry: &CityRegistry, target: &CoastalCity, source: &dyn WeatherSource) -> NearbyRanking {
    let candidates = neighbours(registry, target);
    let evaluated = candidates.len();

    let fetches = candidates.iter().map(|(city, _)| source.current(city));
    let results = join_all(fetches).await;

    let mut failed = 0;
    let mut entries = Vec::with_capacity(evaluated);

    for ((city, distance), result) in candidates.into_iter().zip(results) {
        match result {
            Ok(observation) => {
                let risk = score_additive(&observation);
                entries.push(NearbyRisk {
                    city: city.name,
                    lat: city.lat,
                    lon: city.lon,
                    probability: risk.probability,
                    risk_level: risk.risk_level,
                    distance,
                    alert_color: risk.alert_color,
                });
            }
            Err(e) => {
                tracing::warn!("Skipping neighbour {} of {}: {}", city.name, target.name, e);
                failed += 1;
            }
        }
    }

    // Stable sort keeps registry order between equal distances
    entries.sort_by_key(|entry| entry.distance);
    entries.truncate(MAX_NEARBY);

    NearbyRanking { entries, evaluated, failed }
}
