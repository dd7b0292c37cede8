//! API Handlers
//!
//! HTTP request handlers translating wire requests into cache engine calls.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::warn;

use crate::cache::CacheEngine;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    HealthResponse, MessageResponse, RecordRequest, RecordResponse, StatsResponse,
};
use crate::record::RecordId;
use crate::store::{InMemoryStore, RecordStore};

/// Store handle shared by the engine and whoever else needs it.
pub type SharedStore = Arc<dyn RecordStore>;

/// Application state shared across all handlers.
///
/// The engine serializes its own operations, so handlers share it behind
/// a plain `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<CacheEngine<SharedStore>>,
}

impl AppState {
    /// Creates a new AppState around an existing engine.
    pub fn new(cache: CacheEngine<SharedStore>) -> Self {
        Self {
            cache: Arc::new(cache),
        }
    }

    /// Creates a new AppState caching `store` with the given capacity.
    pub fn with_store(store: SharedStore, max_size: usize) -> Self {
        Self::new(CacheEngine::new(store, max_size))
    }

    /// Creates a new AppState from configuration, backed by an in-memory store.
    pub fn from_config(config: &Config) -> Self {
        Self::with_store(Arc::new(InMemoryStore::new()), config.max_size)
    }
}

/// Handler for POST /api/cache/add
///
/// Persists a record and caches it. Returns the stored record, id included.
pub async fn add_handler(
    State(state): State<AppState>,
    Json(req): Json<RecordRequest>,
) -> Result<Json<RecordResponse>> {
    if let Some(error_msg) = req.validate_for_add() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let saved = state.cache.put(req.into_record()).await?;
    Ok(Json(saved.into()))
}

/// Handler for GET /api/cache/get/:id
pub async fn get_handler(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Result<Json<RecordResponse>> {
    let record = state.cache.get(id).await?;
    Ok(Json(record.into()))
}

/// Handler for DELETE /api/cache/remove
///
/// Removes a record from cache and store. A body without an id is ignored.
pub async fn remove_handler(
    State(state): State<AppState>,
    Json(req): Json<RecordRequest>,
) -> Result<Json<MessageResponse>> {
    match req.id {
        Some(id) => {
            state.cache.remove(id).await?;
            Ok(Json(MessageResponse::new(format!("Record {} removed", id))))
        }
        None => {
            warn!("Remove request without id ignored");
            Ok(Json(MessageResponse::new("No id given, nothing removed")))
        }
    }
}

/// Handler for DELETE /api/cache/removeAll
pub async fn remove_all_handler(State(state): State<AppState>) -> Result<Json<MessageResponse>> {
    state.cache.remove_all().await?;
    Ok(Json(MessageResponse::new(
        "All records removed from cache and store",
    )))
}

/// Handler for POST /api/cache/clear
///
/// Empties the in-memory tier only; later reads go through to the store.
pub async fn clear_handler(State(state): State<AppState>) -> Json<MessageResponse> {
    state.cache.clear_cache_only().await;
    Json(MessageResponse::new("Cache cleared, store untouched"))
}

/// Handler for GET /api/cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.cache.stats().await.into())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
