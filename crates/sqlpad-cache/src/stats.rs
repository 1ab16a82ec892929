//! Cache statistics tracking

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Running counters for cache activity. They survive `clear()`.
#[derive(Debug, Default)]
pub struct CacheCounters {
    /// Number of cache hits
    hits: AtomicU64,
    /// Number of cache misses
    misses: AtomicU64,
    /// Number of tables evicted to make room
    evictions: AtomicU64,
}

impl CacheCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }

    /// Calculate hit rate (0.0 to 1.0)
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits() as f64;
        let total = hits + self.misses() as f64;
        if total == 0.0 {
            0.0
        } else {
            hits / total
        }
    }

    /// Reset all counters
    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
    }
}

/// Bookkeeping for one cached table, copied out of the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheEntryInfo {
    pub name: String,
    /// Milliseconds since the Unix epoch
    pub created_at: u64,
    /// Milliseconds since the Unix epoch
    pub last_accessed_at: u64,
    pub row_count: usize,
}

/// Owned, point-in-time view of the cache. Changing it never touches the cache.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheSnapshot {
    pub size: usize,
    pub capacity: usize,
    /// Cached table names, most recently used first
    pub tables: Vec<String>,
    pub entries: Vec<CacheEntryInfo>,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl CacheSnapshot {
    pub fn contains(&self, table: &str) -> bool {
        self.tables.iter().any(|t| t == table)
    }

    pub fn entry(&self, table: &str) -> Option<&CacheEntryInfo> {
        self.entries.iter().find(|e| e.name == table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_recording() {
        let counters = CacheCounters::new();

        counters.record_hit();
        counters.record_hit();
        counters.record_miss();
        counters.record_eviction();

        assert_eq!(counters.hits(), 2);
        assert_eq!(counters.misses(), 1);
        assert_eq!(counters.evictions(), 1);
    }

    #[test]
    fn test_hit_rate() {
        let counters = CacheCounters::new();
        assert_eq!(counters.hit_rate(), 0.0);

        counters.record_hit();
        counters.record_miss();
        assert!((counters.hit_rate() - 0.5).abs() < f64::EPSILON);

        counters.reset();
        assert_eq!(counters.hits(), 0);
        assert_eq!(counters.misses(), 0);
    }
}
