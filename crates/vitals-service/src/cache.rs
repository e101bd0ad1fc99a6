//! Cached aggregation responses with write invalidation.
//!
//! Responses are keyed by the full query shape plus a per-(user, type)
//! generation counter. Writes bump the generation, so entries for stale
//! data simply stop being addressable and age out through the TTL.

use dashmap::DashMap;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use vitals_common::UserId;
use vitals_engine::{AggregationBucket, DateRange, Granularity, MetricType};

/// Cache key identifying one aggregation query against one data generation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub user_id: UserId,
    pub metric_type: MetricType,
    pub range: DateRange,
    pub granularity: Granularity,
    generation: u64,
}

/// Aggregation response cache.
pub struct AggregationCache {
    entries: Cache<CacheKey, Arc<Vec<AggregationBucket>>>,
    generations: DashMap<(UserId, MetricType), u64>,
}

impl AggregationCache {
    /// Build a cache with the given capacity and entry TTL.
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .build(),
            generations: DashMap::new(),
        }
    }

    /// Key for a query at the current generation of its (user, type) data.
    pub fn key(
        &self,
        user_id: UserId,
        metric_type: MetricType,
        range: DateRange,
        granularity: Granularity,
    ) -> CacheKey {
        let generation = self
            .generations
            .get(&(user_id, metric_type))
            .map(|entry| *entry)
            .unwrap_or(0);
        CacheKey {
            user_id,
            metric_type,
            range,
            granularity,
            generation,
        }
    }

    /// Look up a cached response.
    pub async fn get(&self, key: &CacheKey) -> Option<Arc<Vec<AggregationBucket>>> {
        self.entries.get(key).await
    }

    /// Store a response.
    pub async fn put(&self, key: CacheKey, buckets: Arc<Vec<AggregationBucket>>) {
        self.entries.insert(key, buckets).await;
    }

    /// Invalidate all cached responses for a (user, type) by bumping its
    /// generation.
    pub fn invalidate(&self, user_id: UserId, metric_type: MetricType) {
        let mut entry = self.generations.entry((user_id, metric_type)).or_insert(0);
        *entry += 1;
        debug!(%user_id, %metric_type, generation = *entry, "invalidated aggregation cache");
    }
}
