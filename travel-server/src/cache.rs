//! Caching layer for cost lookups.
//!
//! Tolls and fuel prices depend only on the originating place, and fares
//! on the stop pair, mode and distance, so repeated searches between the
//! same cities hit the cost service once per TTL. Failed lookups are not
//! cached.
//!
//! Distances in fare keys are rounded to whole metres so that float noise
//! does not split otherwise identical keys.

use std::hash::Hash;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::costs::{CostError, CostLookup};
use crate::domain::TransitMode;

/// Cache key for fares: (origin, destination, mode, distance in metres).
type FareKey = (String, String, TransitMode, u64);

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries per lookup kind.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(15 * 60),
            max_capacity: 1000,
        }
    }
}

fn build_cache<K, V>(config: &CacheConfig) -> MokaCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    MokaCache::builder()
        .time_to_live(config.ttl)
        .max_capacity(config.max_capacity)
        .build()
}

/// Cost lookups with caching.
///
/// Wraps any `CostLookup` and implements it again.
pub struct CachedCosts<C> {
    inner: C,
    tolls: MokaCache<String, f64>,
    fuel: MokaCache<String, f64>,
    fares: MokaCache<FareKey, f64>,
}

impl<C: CostLookup> CachedCosts<C> {
    pub fn new(inner: C, config: &CacheConfig) -> Self {
        Self {
            inner,
            tolls: build_cache(config),
            fuel: build_cache(config),
            fares: build_cache(config),
        }
    }

    /// Total cached entries across all lookup kinds (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.tolls.entry_count() + self.fuel.entry_count() + self.fares.entry_count()
    }

    /// Process pending cache maintenance so entry counts are current.
    pub async fn sync(&self) {
        self.tolls.run_pending_tasks().await;
        self.fuel.run_pending_tasks().await;
        self.fares.run_pending_tasks().await;
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.tolls.invalidate_all();
        self.fuel.invalidate_all();
        self.fares.invalidate_all();
    }
}

impl<C: CostLookup> CostLookup for CachedCosts<C> {
    async fn toll_cost(&self, origin: &str) -> Result<f64, CostError> {
        if let Some(cached) = self.tolls.get(origin).await {
            return Ok(cached);
        }
        let cost = self.inner.toll_cost(origin).await?;
        self.tolls.insert(origin.to_string(), cost).await;
        Ok(cost)
    }

    async fn fuel_cost_per_liter(&self, origin: &str) -> Result<f64, CostError> {
        if let Some(cached) = self.fuel.get(origin).await {
            return Ok(cached);
        }
        let cost = self.inner.fuel_cost_per_liter(origin).await?;
        self.fuel.insert(origin.to_string(), cost).await;
        Ok(cost)
    }

    async fn transit_cost(
        &self,
        origin: &str,
        destination: &str,
        mode: TransitMode,
        distance_km: f64,
    ) -> Result<f64, CostError> {
        let key: FareKey = (
            origin.to_string(),
            destination.to_string(),
            mode,
            (distance_km * 1000.0).round() as u64,
        );

        if let Some(cached) = self.fares.get(&key).await {
            return Ok(cached);
        }
        let cost = self
            .inner
            .transit_cost(origin, destination, mode, distance_km)
            .await?;
        self.fares.insert(key, cost).await;
        Ok(cost)
    }
}
