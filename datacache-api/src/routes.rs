//! API route configuration.

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handlers;
use crate::state::AppState;

/// Creates the API router with all routes configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    let data = get(handlers::get_data).fallback(handlers::method_not_allowed);

    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))

        // Dataset, with and without the trailing slash
        .route("/api/data/", data.clone())
        .route("/api/data", data)

        .with_state(state)
}
