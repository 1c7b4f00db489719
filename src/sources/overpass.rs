//! Overpass (OpenStreetMap) client for shelter-candidate features

use super::{fetch_json, GeodataSource, RetryPolicy};
use crate::config::AppConfig;
use crate::error::UpstreamError;
use crate::shelters::GeoElement;
use crate::utils::BoundingBox;
use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;

const SERVICE: &str = "geodata";

/// amenity values that make a building a shelter candidate
pub const SHELTER_AMENITIES: [&str; 6] = [
    "hospital",
    "school",
    "community_centre",
    "social_facility",
    "place_of_worship",
    "townhall",
];

/// Server-side query timeout (seconds)
const QUERY_TIMEOUT_SECS: u32 = 25;

pub struct OverpassClient {
    http: reqwest::Client,
    url: String,
    retry: RetryPolicy,
}

impl OverpassClient {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.geodata_timeout())
            .build()
            .context("Failed to build geodata HTTP client")?;

        Ok(Self {
            http,
            url: config.overpass_url.clone(),
            retry: RetryPolicy::new(config.fetch_retries),
        })
    }
}

/// Overpass QL: every node and way with a shelter amenity or `building=civic`
pub fn shelter_query(bbox: &BoundingBox) -> String {
    let area = bbox.to_overpass();
    let mut query = format!("[out:json][timeout:{}];\n(\n", QUERY_TIMEOUT_SECS);

    let filters = SHELTER_AMENITIES
        .iter()
        .map(|amenity| format!("[\"amenity\"=\"{}\"]", amenity))
        .chain(std::iter::once("[\"building\"=\"civic\"]".to_string()));

    for filter in filters {
        for kind in ["node", "way"] {
            query.push_str(&format!("  {}{}({});\n", kind, filter, area));
        }
    }

    query.push_str(");\nout center;\n");
    query
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<GeoElement>,
}

#[async_trait]
impl GeodataSource for OverpassClient {
    async fn shelter_elements(&self, bbox: &BoundingBox) -> Result<Vec<GeoElement>, UpstreamError> {
        let query = shelter_query(bbox);
        tracing::debug!("POST {} bbox=({})", self.url, bbox.to_overpass());

        let response: OverpassResponse = self
            .retry
            .run(|| fetch_json(SERVICE, self.http.post(&self.url).form(&[("data", query.as_str())])))
            .await?;

        Ok(response.elements)
    }
}
