//! Bounded LRU cache for parsed tables
//!
//! Parsed CSV tables are kept in memory keyed by table name so repeated
//! queries against the same table skip the fetch and parse.
//!
//! # Features
//!
//! - **LRU Eviction**: the least recently accessed table is dropped when the cache is full
//! - **Injectable Clock**: entry timestamps come from a [`Clock`], so tests can pin time
//! - **Thread-Safe**: safe for concurrent access using `RwLock`
//! - **Snapshots**: [`TableCache::snapshot`] returns owned statistics, never live entries
//!
//! # Example
//!
//! ```ignore
//! use sqlpad_cache::{CacheConfig, TableCache};
//!
//! let cache = TableCache::new(CacheConfig::default());
//!
//! if let Some(table) = cache.get("orders") {
//!     return Ok(table);
//! }
//!
//! let table = parse_csv(&fetch("orders").await?);
//! let table = cache.insert("orders", table);
//! ```

pub mod cache;
pub mod clock;
pub mod config;
pub mod stats;

pub use cache::{CacheEntry, TableCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::CacheConfig;
pub use stats::{CacheCounters, CacheEntryInfo, CacheSnapshot};
