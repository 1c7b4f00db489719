//! External collaborators
//!
//! The scorer and ranker never touch the network directly. They consume these
//! traits, which production wires to OpenWeatherMap and Overpass and tests
//! wire to in-memory stubs.

pub mod openweather;
pub mod overpass;

pub use openweather::OpenWeatherClient;
pub use overpass::OverpassClient;

use crate::error::UpstreamError;
use crate::observation::{ForecastPoint, WeatherObservation};
use crate::registry::CoastalCity;
use crate::shelters::GeoElement;
use crate::utils::BoundingBox;
use async_trait::async_trait;
use rand::Rng;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;

/// Current conditions and short-range forecast for a coordinate
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn current(&self, city: &CoastalCity) -> Result<WeatherObservation, UpstreamError>;

    /// Up to `points` forecast points, nearest first
    async fn forecast(&self, lat: f64, lon: f64, points: usize) -> Result<Vec<ForecastPoint>, UpstreamError>;
}

/// Raw shelter-candidate features inside a bounding box
#[async_trait]
pub trait GeodataSource: Send + Sync {
    async fn shelter_elements(&self, bbox: &BoundingBox) -> Result<Vec<GeoElement>, UpstreamError>;
}

// ============================================================================
// Retry policy
// ============================================================================

/// Bounded retry with exponential backoff and random jitter
///
/// Only transient failures (network errors, 5xx, 429) are retried.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Attempts after the first one
    pub retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(retries: u32) -> Self {
        Self { retries, base_delay: Duration::from_millis(250) }
    }

    /// No retries, no sleeping
    pub fn none() -> Self {
        Self { retries: 0, base_delay: Duration::ZERO }
    }

    /// Delay before retry number `attempt` (0-based): base·2^attempt plus up to half a base of jitter
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponential = self.base_delay.saturating_mul(1u32 << attempt.min(16));
        let jitter_ms = self.base_delay.as_millis() as u64 / 2;
        let jitter = if jitter_ms == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..=jitter_ms)
        };
        exponential + Duration::from_millis(jitter)
    }

    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, UpstreamError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, UpstreamError>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt < self.retries => {
                    let delay = self.backoff(attempt);
                    tracing::warn!(
                        "{} (attempt {}/{}), retrying in {:?}",
                        err,
                        attempt + 1,
                        self.retries + 1,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Send a request and decode a JSON body, classifying every failure
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    service: &'static str,
    request: reqwest::RequestBuilder,
) -> Result<T, UpstreamError> {
    let response = request.send().await.map_err(|e| UpstreamError::Request {
        service,
        message: e.to_string(),
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(UpstreamError::Status { service, status: status.as_u16() });
    }

    let body = response.bytes().await.map_err(|e| UpstreamError::Request {
        service,
        message: e.to_string(),
    })?;

    serde_json::from_slice(&body).map_err(|e| UpstreamError::malformed(service, e.to_string()))
}
