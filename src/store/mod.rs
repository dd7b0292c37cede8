//! Record Store Module
//!
//! The durable keyed store the cache writes through to.

mod memory;

pub use memory::InMemoryStore;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::record::{Record, RecordId};

// == Record Store Trait ==
/// Durable keyed collection backing the cache.
///
/// Every method may block on I/O and may fail with
/// [`CacheError::StoreUnavailable`](crate::error::CacheError::StoreUnavailable).
#[async_trait]
pub trait RecordStore: Send + Sync + 'static {
    /// Persists a record and returns it with its id populated.
    ///
    /// A record without an id gets a fresh one; a record with an id
    /// overwrites whatever is stored under it.
    async fn save(&self, record: Record) -> Result<Record>;

    /// Looks a record up by id.
    async fn find_by_id(&self, id: RecordId) -> Result<Option<Record>>;

    /// Returns true if a record with that id is stored.
    async fn exists_by_id(&self, id: RecordId) -> Result<bool>;

    /// Deletes a record. Deleting an absent id is not an error.
    async fn delete_by_id(&self, id: RecordId) -> Result<()>;

    /// Deletes every record.
    async fn delete_all(&self) -> Result<()>;
}

#[async_trait]
impl<S: RecordStore + ?Sized> RecordStore for Arc<S> {
    async fn save(&self, record: Record) -> Result<Record> {
        (**self).save(record).await
    }

    async fn find_by_id(&self, id: RecordId) -> Result<Option<Record>> {
        (**self).find_by_id(id).await
    }

    async fn exists_by_id(&self, id: RecordId) -> Result<bool> {
        (**self).exists_by_id(id).await
    }

    async fn delete_by_id(&self, id: RecordId) -> Result<()> {
        (**self).delete_by_id(id).await
    }

    async fn delete_all(&self) -> Result<()> {
        (**self).delete_all().await
    }
}
