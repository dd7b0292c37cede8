//! Record Module
//!
//! Defines the cached unit and its key.

/// Record identifier. Store-assigned ids start at 1.
pub type RecordId = u64;

/// Returns true when `id` can name a stored record.
pub fn is_valid_id(id: RecordId) -> bool {
    id > 0
}

// == Record ==
/// A record held by the store and mirrored by the cache.
///
/// The cache never looks inside `name`; it only clones records between tiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Store-assigned identifier, `None` until first persisted
    pub id: Option<RecordId>,
    /// Payload
    pub name: String,
}

impl Record {
    /// Creates a record that has not been persisted yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    /// Creates a record with a known id.
    pub fn with_id(id: RecordId, name: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
        }
    }

    /// Returns the id if it is usable as a key.
    ///
    /// A zero id is treated the same as a missing one.
    pub fn key(&self) -> Option<RecordId> {
        self.id.filter(|id| is_valid_id(*id))
    }
}
