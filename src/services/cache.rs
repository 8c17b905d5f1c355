use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::models::AggregatedMatches;

/// In-process cache of aggregated match payloads, keyed by contractor id
///
/// A TTL of zero disables caching; every lookup misses and inserts are no-ops.
pub struct MatchCache {
    inner: Option<moka::future::Cache<i32, Arc<AggregatedMatches>>>,
    ttl_secs: u64,
}

impl MatchCache {
    /// Create a new match cache
    pub fn new(max_entries: u64, ttl_secs: u64) -> Self {
        let inner = (ttl_secs > 0).then(|| {
            moka::future::CacheBuilder::new(max_entries)
                .time_to_live(Duration::from_secs(ttl_secs))
                .build()
        });

        Self { inner, ttl_secs }
    }

    pub fn disabled() -> Self {
        Self::new(0, 0)
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    pub async fn get(&self, contractor_id: i32) -> Option<Arc<AggregatedMatches>> {
        let cache = self.inner.as_ref()?;
        let hit = cache.get(&contractor_id).await;
        if hit.is_some() {
            tracing::trace!("Match cache hit: contractor {}", contractor_id);
        }
        hit
    }

    pub async fn insert(&self, contractor_id: i32, matches: Arc<AggregatedMatches>) {
        if let Some(cache) = &self.inner {
            cache.insert(contractor_id, matches).await;
            tracing::trace!("Match cache set: contractor {}", contractor_id);
        }
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            enabled: self.is_enabled(),
            entries: self.inner.as_ref().map_or(0, |cache| cache.entry_count()),
            ttl_secs: self.ttl_secs,
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub enabled: bool,
    pub entries: u64,
    pub ttl_secs: u64,
}
