//! LRU table cache implementation

use crate::clock::{Clock, SystemClock};
use crate::config::CacheConfig;
use crate::stats::{CacheCounters, CacheEntryInfo, CacheSnapshot};
use lru::LruCache;
use parking_lot::RwLock;
use sqlpad_core::TableData;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::debug;

/// Entry stored in the cache
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Parsed table, shared read-only with callers
    pub data: Arc<TableData>,
    /// When this entry was inserted (ms since epoch)
    pub created_at: u64,
    /// Last hit or insert (ms since epoch)
    pub last_accessed_at: u64,
}

impl CacheEntry {
    fn new(data: Arc<TableData>, now: u64) -> Self {
        Self {
            data,
            created_at: now,
            last_accessed_at: now,
        }
    }
}

/// Thread-safe, bounded cache of parsed tables keyed by table name.
///
/// Recency order is kept by the underlying [`LruCache`]; every hit and insert
/// also stamps `last_accessed_at`, so with a non-decreasing clock the evicted
/// table is always the one with the oldest access timestamp.
pub struct TableCache {
    entries: RwLock<LruCache<String, CacheEntry>>,
    config: CacheConfig,
    clock: Arc<dyn Clock>,
    counters: Arc<CacheCounters>,
}

impl TableCache {
    pub fn new(config: CacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        let capacity = NonZeroUsize::new(config.capacity()).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: RwLock::new(LruCache::new(capacity)),
            config,
            clock,
            counters: Arc::new(CacheCounters::new()),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(CacheConfig::default())
    }

    /// Look up a table, refreshing its access time on a hit.
    pub fn get(&self, table: &str) -> Option<Arc<TableData>> {
        let found = self.touch(table);
        if found.is_some() {
            self.counters.record_hit();
            debug!(table, "table cache hit");
        } else {
            self.counters.record_miss();
            debug!(table, "table cache miss");
        }
        found
    }

    /// Like [`get`](Self::get), but leaves the hit and miss counters alone.
    pub fn touch(&self, table: &str) -> Option<Arc<TableData>> {
        let now = self.clock.now_millis();
        let mut entries = self.entries.write();
        entries.get_mut(table).map(|entry| {
            entry.last_accessed_at = now;
            Arc::clone(&entry.data)
        })
    }

    /// Insert a freshly parsed table, evicting the least recently accessed
    /// entry first when the cache is full.
    pub fn insert(&self, table: impl Into<String>, data: TableData) -> Arc<TableData> {
        let table = table.into();
        let data = Arc::new(data);
        let entry = CacheEntry::new(Arc::clone(&data), self.clock.now_millis());

        let mut entries = self.entries.write();
        if let Some((evicted, _)) = entries.push(table.clone(), entry) {
            if evicted != table {
                self.counters.record_eviction();
                debug!(evicted = %evicted, inserted = %table, "evicted table from cache");
            }
        }
        debug!(table = %table, size = entries.len(), "cached table");

        data
    }

    /// True when `table` is cached. Does not count as an access.
    pub fn contains(&self, table: &str) -> bool {
        self.entries.read().contains(table)
    }

    /// Empty the cache. Counters are kept.
    pub fn clear(&self) {
        let mut entries = self.entries.write();
        let dropped = entries.len();
        entries.clear();
        debug!(dropped, "cleared table cache");
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.config.capacity()
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn counters(&self) -> Arc<CacheCounters> {
        Arc::clone(&self.counters)
    }

    /// Copy out the current cache state.
    pub fn snapshot(&self) -> CacheSnapshot {
        let entries = self.entries.read();
        let infos: Vec<CacheEntryInfo> = entries
            .iter()
            .map(|(name, entry)| CacheEntryInfo {
                name: name.clone(),
                created_at: entry.created_at,
                last_accessed_at: entry.last_accessed_at,
                row_count: entry.data.num_rows(),
            })
            .collect();

        CacheSnapshot {
            size: entries.len(),
            capacity: self.capacity(),
            tables: infos.iter().map(|e| e.name.clone()).collect(),
            entries: infos,
            hits: self.counters.hits(),
            misses: self.counters.misses(),
            evictions: self.counters.evictions(),
        }
    }
}

impl Default for TableCache {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for TableCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableCache")
            .field("max_entries", &self.config.max_entries)
            .field("current_entries", &self.len())
            .field("clock", &self.clock)
            .finish()
    }
}
