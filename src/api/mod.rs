//! API Module
//!
//! HTTP handlers and routing for the cache service REST API.
//!
//! # Endpoints
//! - `POST /api/cache/add` - Persist and cache a record
//! - `GET /api/cache/get/:id` - Read a record, through to the store on a miss
//! - `DELETE /api/cache/remove` - Remove a record from cache and store
//! - `DELETE /api/cache/removeAll` - Empty cache and store
//! - `POST /api/cache/clear` - Empty the cache only
//! - `GET /api/cache/stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
