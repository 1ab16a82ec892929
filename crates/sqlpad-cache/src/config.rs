//! Cache configuration options

/// Number of tables kept when no capacity is configured.
pub const DEFAULT_MAX_ENTRIES: usize = 5;

/// Configuration for the table cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of tables in the cache
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

impl CacheConfig {
    pub fn new(max_entries: usize) -> Self {
        Self { max_entries }
    }

    /// Set the maximum number of entries
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Capacity actually used by the cache; zero is clamped to one.
    pub fn capacity(&self) -> usize {
        self.max_entries.max(1)
    }
}
