// file: src/cache/result_cache.rs
// description: TTL and LRU bounded memo of normalized query to ranked result
// reference: https://docs.rs/lru

use crate::config::CacheConfig;
use crate::models::RankedResult;
use crate::utils::Clock;
use lru::LruCache;
use serde::Serialize;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::debug;

/// Storage seam for ranked results, owned by the pipeline.
pub trait ResultStore: Send + Sync {
    fn get(&self, query: &str) -> Option<RankedResult>;
    fn put(&self, query: &str, result: RankedResult);
    fn stats(&self) -> CacheStats;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub expirations: u64,
    pub evictions: u64,
    pub entries: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            return 0.0;
        }
        (self.hits as f64 / total as f64) * 100.0
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    result: RankedResult,
    created_at: Instant,
}

pub struct LruResultCache {
    entries: Mutex<LruCache<String, CacheEntry>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    hits: AtomicU64,
    misses: AtomicU64,
    expirations: AtomicU64,
    evictions: AtomicU64,
}

impl LruResultCache {
    pub fn new(capacity: NonZeroUsize, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
            clock,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            expirations: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Builds the configured store: an LRU cache, or a no-op when disabled.
    pub fn from_config(config: &CacheConfig, clock: Arc<dyn Clock>) -> Arc<dyn ResultStore> {
        match NonZeroUsize::new(config.capacity) {
            Some(capacity) if config.enabled => Arc::new(Self::new(capacity, config.ttl(), clock)),
            _ => Arc::new(NoopCache::default()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LruCache<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ResultStore for LruResultCache {
    fn get(&self, query: &str) -> Option<RankedResult> {
        let now = self.clock.now();
        let mut entries = self.lock();

        let expired = match entries.get(query) {
            Some(entry) if now.saturating_duration_since(entry.created_at) < self.ttl => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!("Cache hit for \"{}\"", query);
                return Some(entry.result.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            entries.pop(query);
            self.expirations.fetch_add(1, Ordering::Relaxed);
            debug!("Cache entry for \"{}\" expired", query);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    fn put(&self, query: &str, result: RankedResult) {
        let entry = CacheEntry {
            result,
            created_at: self.clock.now(),
        };

        let mut entries = self.lock();
        if let Some((evicted, _)) = entries.push(query.to_string(), entry) {
            if evicted != query {
                self.evictions.fetch_add(1, Ordering::Relaxed);
                debug!("Evicted least recently used entry \"{}\"", evicted);
            }
        }
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            expirations: self.expirations.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            entries: self.lock().len(),
        }
    }
}

/// Never stores anything; every lookup is a miss.
#[derive(Debug, Default)]
pub struct NoopCache {
    misses: AtomicU64,
}

impl ResultStore for NoopCache {
    fn get(&self, _query: &str) -> Option<RankedResult> {
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    fn put(&self, _query: &str, _result: RankedResult) {}

    fn stats(&self) -> CacheStats {
        CacheStats {
            misses: self.misses.load(Ordering::Relaxed),
            ..CacheStats::default()
        }
    }
}
