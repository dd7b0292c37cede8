//! Cache Engine Module
//!
//! Write-through LRU cache in front of a `RecordStore`.

use std::collections::HashMap;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::cache::{CacheStats, LruTracker};
use crate::error::{CacheError, Result};
use crate::record::{is_valid_id, Record, RecordId};
use crate::store::RecordStore;

// == Cache State ==
/// Everything guarded by the engine lock.
///
/// The map and the tracker always hold the same key set.
#[derive(Debug)]
struct CacheState {
    entries: HashMap<RecordId, Record>,
    lru: LruTracker<RecordId>,
    stats: CacheStats,
}

impl CacheState {
    fn new(max_size: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(max_size + 1),
            lru: LruTracker::with_capacity(max_size + 1),
            stats: CacheStats::new(max_size),
        }
    }

    fn insert(&mut self, id: RecordId, record: Record) {
        self.entries.insert(id, record);
        self.lru.insert(id);
    }

    fn remove(&mut self, id: RecordId) -> bool {
        self.lru.remove(&id);
        self.entries.remove(&id).is_some()
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
    }
}

// == Cache Engine ==
/// Bounded write-through cache over a durable record store.
///
/// Every record in memory is also in the store. Once more than `max_size`
/// records are held, the least recently used one is dropped from memory
/// (it stays in the store).
///
/// All operations run under one lock that also covers their store calls, so
/// store latency serializes callers. That keeps overflow checks and
/// miss-then-populate atomic, at the cost of throughput on slow stores.
#[derive(Debug)]
pub struct CacheEngine<S> {
    store: S,
    max_size: usize,
    state: Mutex<CacheState>,
}

impl<S: RecordStore> CacheEngine<S> {
    // == Constructor ==
    /// Creates an empty cache holding at most `max_size` records.
    ///
    /// A capacity of zero is raised to one.
    pub fn new(store: S, max_size: usize) -> Self {
        if max_size == 0 {
            warn!("Cache capacity must be positive, using 1");
        }
        let max_size = max_size.max(1);
        Self {
            store,
            max_size,
            state: Mutex::new(CacheState::new(max_size)),
        }
    }

    // == Put ==
    /// Persists a record and caches it.
    ///
    /// Records without an id get one from the store. The returned record is
    /// the canonical stored copy. Nothing is cached if the save fails.
    pub async fn put(&self, record: Record) -> Result<Record> {
        let mut state = self.state.lock().await;

        let saved = self.store.save(record).await?;
        let id = saved.key().ok_or_else(|| {
            CacheError::Internal("store returned a record without an id".to_string())
        })?;

        state.insert(id, saved.clone());
        self.evict_overflow(&mut state).await;

        info!(id, "Record saved to store and added to cache");
        Ok(saved)
    }

    // == Get ==
    /// Returns the record with the given id.
    ///
    /// Served from memory when cached, otherwise read from the store and
    /// cached, which may evict another record.
    pub async fn get(&self, id: RecordId) -> Result<Record> {
        if !is_valid_id(id) {
            warn!(id, "Attempted to get record without a valid id");
            return Err(CacheError::InvalidKey(format!(
                "record id must be positive, got {}",
                id
            )));
        }

        let mut state = self.state.lock().await;

        if let Some(record) = state.entries.get(&id).cloned() {
            state.lru.touch(&id);
            state.stats.record_hit();
            debug!(id, "Record found in cache");
            return Ok(record);
        }

        state.stats.record_miss();
        match self.store.find_by_id(id).await? {
            Some(record) => {
                state.insert(id, record.clone());
                self.evict_overflow(&mut state).await;
                info!(id, "Record fetched from store and added to cache");
                Ok(record)
            }
            None => Err(CacheError::NotFound(format!(
                "Record with id {} not found",
                id
            ))),
        }
    }

    // == Remove ==
    /// Removes a record from memory and from the store.
    ///
    /// Removing an unknown or invalid id is a no-op. If the store delete
    /// fails the cache is left as it was.
    pub async fn remove(&self, id: RecordId) -> Result<()> {
        if !is_valid_id(id) {
            warn!(id, "Attempted to remove record without a valid id");
            return Ok(());
        }

        let mut state = self.state.lock().await;

        let exists = match self.store.exists_by_id(id).await {
            Ok(exists) => exists,
            Err(err) => {
                // Deleting is idempotent, so just try it.
                warn!(id, error = %err, "Store existence check failed before delete");
                true
            }
        };

        if exists {
            self.store.delete_by_id(id).await?;
        }

        if state.remove(id) || exists {
            info!(id, "Record removed from cache and store");
        } else {
            debug!(id, "Record was neither cached nor stored");
        }

        Ok(())
    }

    // == Remove All ==
    /// Empties both the cache and the store.
    pub async fn remove_all(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        state.clear();
        self.store.delete_all().await?;

        info!("All records removed from cache and store");
        Ok(())
    }

    // == Clear Cache Only ==
    /// Empties the cache and leaves the store untouched.
    pub async fn clear_cache_only(&self) {
        self.state.lock().await.clear();
        info!("Cache cleared, store untouched");
    }

    // == Introspection ==
    /// Returns the number of cached records.
    pub async fn len(&self) -> usize {
        self.state.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.entries.is_empty()
    }

    /// Returns true if the record is held in memory. Does not affect recency.
    pub async fn contains(&self, id: RecordId) -> bool {
        self.state.lock().await.entries.contains_key(&id)
    }

    /// Cached ids, least recently used first.
    pub async fn cached_ids(&self) -> Vec<RecordId> {
        self.state.lock().await.lru.iter().copied().collect()
    }

    /// Returns the counters together with the current occupancy.
    pub async fn stats(&self) -> CacheStats {
        let state = self.state.lock().await;
        let mut stats = state.stats.clone();
        stats.total_entries = state.entries.len();
        stats
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    // == Eviction ==
    /// Drops the least recently used record if the cache is over capacity.
    ///
    /// Called after every insertion, so at most one record is ever over.
    async fn evict_overflow(&self, state: &mut CacheState) {
        if state.entries.len() <= self.max_size {
            return;
        }
        let Some(victim) = state.lru.victim().copied() else {
            return;
        };

        if let Some(record) = state.entries.get(&victim).cloned() {
            // Already durable; the re-save is an idempotent upsert.
            if let Err(err) = self.store.save(record).await {
                warn!(id = victim, error = %err, "Failed to re-save evicted record");
            }
        }

        state.remove(victim);
        state.stats.record_eviction();
        info!(id = victim, "Evicted record from cache");
    }
}
