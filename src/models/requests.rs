//! Request DTOs for the cache service API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::record::{Record, RecordId};

/// Request body for add (POST /api/cache/add) and remove (DELETE /api/cache/remove)
///
/// # Fields
/// - `id`: Record id; omitted on add to let the store assign one
/// - `name`: Record payload; required on add, ignored on remove
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordRequest {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub name: Option<String>,
}

impl RecordRequest {
    /// Validates the request for an add.
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate_for_add(&self) -> Option<String> {
        match self.name.as_deref() {
            None | Some("") => Some("Name cannot be empty".to_string()),
            Some(_) => None,
        }
    }

    /// Converts the request into a record to persist.
    pub fn into_record(self) -> Record {
        Record {
            id: self.id,
            name: self.name.unwrap_or_default(),
        }
    }
}
