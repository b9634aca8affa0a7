//! DTOs for API responses.
//!
//! The dataset endpoint serializes [`datacache_core::Envelope`] directly;
//! only the health endpoint needs its own shape.

use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Crate version
    pub version: String,
    /// Seconds since the state was built
    pub uptime_seconds: u64,
    /// Regenerations performed so far
    pub generations: u64,
    /// Cache backend name
    pub cache_backend: String,
    /// Key of the cache slot
    pub cache_key: String,
    /// Slot TTL in seconds
    pub ttl_seconds: u64,
}
