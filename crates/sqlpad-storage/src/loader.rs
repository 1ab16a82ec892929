//! Table loader: cache in front of a [`TableSource`]

use crate::csv::parse_csv;
use crate::source::TableSource;
use dashmap::DashMap;
use sqlpad_cache::{CacheConfig, CacheSnapshot, TableCache};
use sqlpad_core::{Result, TableData};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Loads tables by name, serving repeats from a bounded [`TableCache`].
///
/// At most one fetch per table name is in flight: concurrent loads of the same
/// uncached table wait on the first one and then read its result from the
/// cache.
#[derive(Debug)]
pub struct TableLoader {
    source: Arc<dyn TableSource>,
    cache: Arc<TableCache>,
    in_flight: DashMap<String, Arc<Mutex<()>>>,
}

impl TableLoader {
    pub fn new(source: Arc<dyn TableSource>, cache: Arc<TableCache>) -> Self {
        Self {
            source,
            cache,
            in_flight: DashMap::new(),
        }
    }

    pub fn with_config(source: Arc<dyn TableSource>, config: CacheConfig) -> Self {
        Self::new(source, Arc::new(TableCache::new(config)))
    }

    /// Return the parsed table, fetching it only on a cache miss.
    pub async fn load(&self, table: &str) -> Result<Arc<TableData>> {
        if let Some(data) = self.cache.get(table) {
            return Ok(data);
        }

        let gate = Arc::clone(self.in_flight.entry(table.to_string()).or_default().value());
        let guard = gate.lock().await;

        // Another caller may have filled the cache while we waited. This call
        // was already counted as a miss.
        let result = match self.cache.touch(table) {
            Some(data) => Ok(data),
            None => self.fetch_and_cache(table).await,
        };

        drop(guard);
        drop(gate);
        self.in_flight
            .remove_if(table, |_, gate| Arc::strong_count(gate) == 1);

        result
    }

    async fn fetch_and_cache(&self, table: &str) -> Result<Arc<TableData>> {
        debug!(table, location = %self.source.location(table), "fetching table");
        let text = self.source.fetch(table).await?;
        let data = parse_csv(&text);
        info!(
            table,
            rows = data.num_rows(),
            columns = data.num_columns(),
            "loaded table"
        );
        Ok(self.cache.insert(table, data))
    }

    /// Empty the table cache.
    pub fn clear(&self) {
        self.cache.clear();
    }

    /// Point-in-time copy of the cache state.
    pub fn stats(&self) -> CacheSnapshot {
        self.cache.snapshot()
    }

    pub fn cache(&self) -> &Arc<TableCache> {
        &self.cache
    }

    pub fn source(&self) -> &Arc<dyn TableSource> {
        &self.source
    }
}
