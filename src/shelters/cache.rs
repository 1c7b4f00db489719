//! Shelter result cache
//!
//! Process-lifetime memoization of ranked shelters per (city, coordinate).
//! Entries never expire and are never evicted. Concurrent misses for the same
//! key share a single load; failed loads are not cached.

use super::ShelterCandidate;
use crate::error::UpstreamError;
use moka::future::Cache;
use std::future::Future;
use std::sync::Arc;

pub type CachedShelters = Arc<Vec<ShelterCandidate>>;

#[derive(Clone)]
pub struct ShelterCache {
    inner: Cache<String, CachedShelters>,
}

impl ShelterCache {
    pub fn new() -> Self {
        // No max_capacity and no TTL: the key space is bounded by the registry
        Self { inner: Cache::builder().build() }
    }

    /// Cache key: city name plus coordinate at four decimal places
    pub fn key(city: &str, lat: f64, lon: f64) -> String {
        format!("{}_{:.4}_{:.4}", city, lat, lon)
    }

    /// Return the cached ranking for `key`, or run `load` and remember its result
    pub async fn get_or_load<F>(&self, key: String, load: F) -> Result<CachedShelters, Arc<UpstreamError>>
    where
        F: Future<Output = Result<Vec<ShelterCandidate>, UpstreamError>>,
    {
        self.inner.try_get_with(key, async move { load.await.map(Arc::new) }).await
    }

    pub async fn get(&self, key: &str) -> Option<CachedShelters> {
        self.inner.get(key).await
    }

    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }
}

impl Default for ShelterCache {
    fn default() -> Self {
        Self::new()
    }
}
