//! LRU Store Cache - A bounded write-through cache in front of a record store
//!
//! Every cached record is also durable in the store; overflow evicts the
//! least recently used record from memory only.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod record;
pub mod store;

pub use api::AppState;
pub use cache::CacheEngine;
pub use config::Config;
pub use error::CacheError;
pub use record::{Record, RecordId};
pub use store::{InMemoryStore, RecordStore};
