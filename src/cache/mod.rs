//! Cache Module
//!
//! Bounded in-memory tier with LRU eviction, written through to a record store.

mod engine;
mod lru;
mod stats;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use engine::CacheEngine;
pub use lru::LruTracker;
pub use stats::CacheStats;
