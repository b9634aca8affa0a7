//! API route handlers.

use std::sync::Arc;

use axum::{extract::State, http::Method, response::IntoResponse, Json};
use tracing::debug;

use datacache_core::constants::CACHE_STATUS_HEADER;
use datacache_core::error::DataCacheError;

use crate::dto::HealthResponse;
use crate::error::ApiError;
use crate::state::AppState;

type Result<T> = std::result::Result<T, ApiError>;

/// GET /api/data/
///
/// Serves the memoized envelope. The stored `cache_info.cached` flag is left
/// as generated; the `x-cache` header reports HIT, MISS or BYPASS for this
/// request.
pub async fn get_data(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse> {
    let fetched = state.generator.fetch_or_generate().await?;

    debug!(
        status = %fetched.status,
        generated_at = %fetched.envelope.generated_at,
        "Serving dataset"
    );

    Ok((
        [(CACHE_STATUS_HEADER, fetched.status.as_str())],
        Json(fetched.envelope),
    ))
}

/// Any non-GET method on the dataset route.
pub async fn method_not_allowed(method: Method) -> ApiError {
    DataCacheError::InvalidMethod(method.to_string()).into()
}

/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        generations: state.generator.generations(),
        cache_backend: state.generator.backend_name().into(),
        cache_key: state.config.cache_key.clone(),
        ttl_seconds: state.config.ttl_seconds,
    })
}
