//! # datacache API Server
//!
//! HTTP surface for the memoized dataset.
//!
//! ## Endpoints
//!
//! - `GET /api/data/` - The generated dataset envelope (cached for the slot TTL)
//! - `GET /health` - Liveness plus regeneration counters
//!
//! Every dataset response carries an `x-cache` header (`HIT`, `MISS` or
//! `BYPASS`) reporting how that particular request was served.
//!
//! ## Example
//!
//! ```rust,ignore
//! use datacache_api::{ApiServer, ApiConfig};
//!
//! let config = ApiConfig::from_env()?;
//! let server = ApiServer::new(config)?;
//! server.run(([0, 0, 0, 0], 8000)).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod routes;
mod handlers;
mod state;
mod dto;
mod error;

pub use routes::create_router;
pub use state::{AppState, ApiConfig, CacheBackend};
pub use dto::HealthResponse;
pub use error::ApiError;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use datacache_core::error::Result;

/// API server for datacache.
pub struct ApiServer {
    state: Arc<AppState>,
}

impl ApiServer {
    /// Creates a new API server with the given configuration.
    pub fn new(config: ApiConfig) -> Result<Self> {
        Ok(Self::from_state(Arc::new(AppState::new(config)?)))
    }

    /// Creates a server around prepared state.
    pub fn from_state(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Creates the router with all routes configured.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        create_router(self.state.clone())
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Runs the server on the given address until Ctrl+C.
    pub async fn run(self, addr: impl Into<SocketAddr>) -> std::io::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr.into()).await?;
        self.serve(listener).await
    }

    /// Serves on an already bound listener until Ctrl+C.
    pub async fn serve(self, listener: tokio::net::TcpListener) -> std::io::Result<()> {
        let addr = listener.local_addr()?;

        info!(
            %addr,
            backend = self.state.generator.backend_name(),
            cache_key = %self.state.generator.config().cache_key,
            ttl_seconds = self.state.generator.config().ttl.as_secs(),
            "datacache API server listening"
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}
