//! Cache Statistics Module
//!
//! Counts hits, misses and evictions of the cache engine.

use serde::Serialize;

// == Cache Stats ==
/// Engine counters plus a point-in-time view of occupancy.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Gets served from memory
    pub hits: u64,
    /// Gets that had to consult the store
    pub misses: u64,
    /// Records dropped from memory to respect capacity
    pub evictions: u64,
    /// Records currently held in memory
    pub total_entries: usize,
    /// Configured capacity
    pub max_size: usize,
}

impl CacheStats {
    /// Creates zeroed counters for a cache of the given capacity.
    pub fn new(max_size: usize) -> Self {
        Self {
            max_size,
            ..Self::default()
        }
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 before any Get.
    pub fn hit_rate(&self) -> f64 {
        match self.hits + self.misses {
            0 => 0.0,
            total => self.hits as f64 / total as f64,
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }
}
