//! Coastal Storm Risk
//!
//! Heuristic storm-risk scoring for a fixed set of Indian coastal cities.
//!
//! - `scoring/`: additive and coast-calibrated strategies, timeline synthesis
//! - `nearby`: risk of neighbouring cities within 500 km
//! - `shelters/`: shelter classification, ranking and result cache
//! - `sources/`: weather and geodata collaborators (OpenWeatherMap, Overpass)
//! - `api_server`: Axum JSON API (feature `api`)
//!
//! Scoring is pure and synchronous; only the collaborators touch the network.

pub mod config;
pub mod error;
pub mod nearby;
pub mod observation;
pub mod registry;
pub mod scoring;
pub mod shelters;
pub mod sources;
pub mod utils;

pub mod api_server;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::UpstreamError;
pub use nearby::{rank_nearby, NearbyRanking, NearbyRisk};
pub use observation::{ForecastPoint, WeatherObservation};
pub use registry::{CityRegistry, Coast, CoastalCity};
pub use scoring::{compute_storm_risk, compute_storm_risk_at, RiskTier, ScoringStrategy, StormRisk};
pub use shelters::{find_shelters, rank_shelters, GeoElement, ShelterCache, ShelterCandidate};
pub use sources::{GeodataSource, WeatherSource};

#[cfg(feature = "api")]
pub use api_server::{create_router, AppState};

#[cfg(feature = "api")]
pub use error::AppError;
