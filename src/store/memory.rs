//! In-Memory Record Store
//!
//! Process-local `RecordStore` with identity-style id assignment.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use crate::error::{CacheError, Result};
use crate::record::{Record, RecordId};
use crate::store::RecordStore;

#[derive(Debug)]
struct Tables {
    records: BTreeMap<RecordId, Record>,
    /// Next id to hand out, `None` once `RecordId::MAX` has been used
    next_id: Option<RecordId>,
}

// == In-Memory Store ==
/// Keyed record store held in process memory.
///
/// Ids are assigned from 1 upwards and are never reused, even after
/// `delete_all`. The store can be switched offline to simulate an
/// unreachable backend: while offline every call fails with
/// `StoreUnavailable`.
#[derive(Debug)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    available: AtomicBool,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables {
                records: BTreeMap::new(),
                next_id: Some(1),
            }),
            available: AtomicBool::new(true),
        }
    }

    /// Brings the store online or takes it offline.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.tables.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.lock().records.is_empty()
    }

    fn ensure_available(&self, op: &str) -> Result<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(CacheError::StoreUnavailable(format!(
                "in-memory store is offline ({})",
                op
            )))
        }
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn save(&self, record: Record) -> Result<Record> {
        self.ensure_available("save")?;

        let mut tables = self.tables.lock();
        let id = match record.key() {
            Some(id) => {
                // Keep generated ids clear of ones chosen by callers.
                if tables.next_id.is_some_and(|next| id >= next) {
                    tables.next_id = id.checked_add(1);
                }
                id
            }
            None => {
                let id = tables.next_id.ok_or_else(|| {
                    CacheError::StoreUnavailable("id space exhausted".to_string())
                })?;
                tables.next_id = id.checked_add(1);
                id
            }
        };

        let saved = Record::with_id(id, record.name);
        tables.records.insert(id, saved.clone());
        debug!(id, "Record saved to store");
        Ok(saved)
    }

    async fn find_by_id(&self, id: RecordId) -> Result<Option<Record>> {
        self.ensure_available("find_by_id")?;
        Ok(self.tables.lock().records.get(&id).cloned())
    }

    async fn exists_by_id(&self, id: RecordId) -> Result<bool> {
        self.ensure_available("exists_by_id")?;
        Ok(self.tables.lock().records.contains_key(&id))
    }

    async fn delete_by_id(&self, id: RecordId) -> Result<()> {
        self.ensure_available("delete_by_id")?;
        if self.tables.lock().records.remove(&id).is_some() {
            debug!(id, "Record deleted from store");
        }
        Ok(())
    }

    async fn delete_all(&self) -> Result<()> {
        self.ensure_available("delete_all")?;
        self.tables.lock().records.clear();
        Ok(())
    }
}
