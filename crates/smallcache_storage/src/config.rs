//! Configuration for a cache instance.

/// Tuning knobs for a [`Cache`](crate::Cache).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheConfig {
    /// Entities to reserve room for at construction.
    pub initial_capacity: usize,

    /// Reserve the declared `count` of each loaded page up front.
    pub reserve_from_page_count: bool,

    /// Release pool strings no entity references when a transaction ends.
    pub purge_unused_strings: bool,

    /// Strings up to this many bytes are reported as inline (no heap bytes).
    pub inline_string_threshold: usize,

    /// Bookkeeping bytes charged per pooled string in stats.
    pub pool_entry_overhead: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            reserve_from_page_count: true,
            purge_unused_strings: true,
            inline_string_threshold: 0,
            pool_entry_overhead: 32,
        }
    }
}

impl CacheConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the initial entity capacity.
    #[must_use]
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Builder method to enable/disable reserving from page counts.
    #[must_use]
    pub fn with_reserve_from_page_count(mut self, reserve: bool) -> Self {
        self.reserve_from_page_count = reserve;
        self
    }

    /// Builder method to enable/disable purging unused pool strings.
    #[must_use]
    pub fn with_purge_unused_strings(mut self, purge: bool) -> Self {
        self.purge_unused_strings = purge;
        self
    }

    /// Builder method to set the inline string threshold used by stats.
    #[must_use]
    pub fn with_inline_string_threshold(mut self, bytes: usize) -> Self {
        self.inline_string_threshold = bytes;
        self
    }

    /// Builder method to set the per-entry pool overhead used by stats.
    #[must_use]
    pub fn with_pool_entry_overhead(mut self, bytes: usize) -> Self {
        self.pool_entry_overhead = bytes;
        self
    }
}
