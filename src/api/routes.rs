//! API Routes
//!
//! Configures the Axum router with all cache service endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    add_handler, clear_handler, get_handler, health_handler, remove_all_handler,
    remove_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let cache_routes = Router::new()
        .route("/add", post(add_handler))
        .route("/get/:id", get(get_handler))
        .route("/remove", delete(remove_handler))
        .route("/removeAll", delete(remove_all_handler))
        .route("/clear", post(clear_handler))
        .route("/stats", get(stats_handler));

    Router::new()
        .nest("/api/cache", cache_routes)
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
