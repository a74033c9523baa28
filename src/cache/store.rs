//! Expiring in-memory store for completed answers.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use tokio::time::Instant;

use crate::telemetry;

/// Configuration for the response cache and its background sweep.
///
/// The sweep interval is intentionally coarser than typical entry TTLs:
/// the sweep is housekeeping, while correctness comes from the
/// lookup-time expiration check.
///
/// ```rust
/// # use muninn::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .ttl(Duration::from_secs(120))
///     .sweep_interval(Duration::from_secs(30));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Lifetime of a stored entry. Default: 5 minutes.
    pub ttl: Duration,
    /// Period of the background sweep. Default: 60 seconds.
    pub sweep_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            sweep_interval: Duration::from_secs(60),
        }
    }
}

impl CacheConfig {
    /// Create a config with the default lifetime and sweep period.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the entry lifetime.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the background sweep period.
    pub fn sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }
}

struct CacheEntry {
    content: String,
    expires_at: Instant,
}

/// Expiring map from request keys to completed answers.
///
/// Reads share the lock, so concurrent lookups never block each other;
/// stores and sweeps take the write lock for the duration of one map
/// operation only. Expiration uses `tokio::time::Instant`, which lets
/// tests drive TTLs deterministically under paused time.
#[derive(Default)]
pub struct ResponseCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl ResponseCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an answer; hits only while the entry's expiration is
    /// strictly in the future. Emits cache hit/miss counters.
    pub fn lookup(&self, key: &str) -> Option<String> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        let hit = entries
            .get(key)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.content.clone());
        drop(entries);

        if hit.is_some() {
            metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
        } else {
            metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
        }
        hit
    }

    /// Insert or overwrite an answer, expiring `ttl` from now.
    pub fn store(&self, key: String, content: String, ttl: Duration) {
        let entry = CacheEntry {
            content,
            expires_at: Instant::now() + ttl,
        };
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key, entry);
    }

    /// Remove every expired entry, returning how many were dropped.
    ///
    /// Housekeeping only; [`lookup`](Self::lookup) is correct without it.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        let removed = before - entries.len();
        drop(entries);

        if removed > 0 {
            metrics::counter!(telemetry::CACHE_EVICTIONS_TOTAL).increment(removed as u64);
        }
        removed
    }

    /// Number of entries currently held, expired or not.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(300));
        assert_eq!(config.sweep_interval, Duration::from_secs(60));
    }

    #[test]
    fn config_builder() {
        let config = CacheConfig::new()
            .ttl(Duration::from_secs(30))
            .sweep_interval(Duration::from_secs(5));
        assert_eq!(config.ttl, Duration::from_secs(30));
        assert_eq!(config.sweep_interval, Duration::from_secs(5));
    }

    #[test]
    fn store_then_lookup() {
        let cache = ResponseCache::new();
        assert!(cache.is_empty());

        cache.store("k".into(), "v".into(), Duration::from_secs(60));
        assert_eq!(cache.lookup("k").as_deref(), Some("v"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn sweep_on_empty_cache_removes_nothing() {
        let cache = ResponseCache::new();
        assert_eq!(cache.sweep(), 0);
    }
}
