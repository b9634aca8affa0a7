//! Common traits for datacache.
//!
//! The generator depends only on this narrow storage contract, so any
//! key-value store with TTL support can back the cache slot.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::Envelope;

// ═══════════════════════════════════════════════════════════════════════════════
// CACHE STORE TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Interface for the cache backend holding generated envelopes.
///
/// Implementations might use:
/// - In-process memory (single-node deployments, tests)
/// - Redis (shared across processes)
///
/// Every method may fail with [`DataCacheError::CacheUnavailable`] when the
/// backend cannot be reached.
///
/// [`DataCacheError::CacheUnavailable`]: crate::error::DataCacheError::CacheUnavailable
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns the envelope stored under `key`, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Arc<Envelope>>>;

    /// Stores `value` under `key`, replacing any previous value, expiring after `ttl`.
    async fn set(&self, key: &str, value: Arc<Envelope>, ttl: Duration) -> Result<()>;

    /// Removes the value stored under `key`, if any.
    async fn invalidate(&self, key: &str) -> Result<()>;

    /// Short backend name for logs and health output.
    fn backend_name(&self) -> &'static str;
}

#[async_trait]
impl<S: CacheStore + ?Sized> CacheStore for Arc<S> {
    async fn get(&self, key: &str) -> Result<Option<Arc<Envelope>>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: Arc<Envelope>, ttl: Duration) -> Result<()> {
        (**self).set(key, value, ttl).await
    }

    async fn invalidate(&self, key: &str) -> Result<()> {
        (**self).invalidate(key).await
    }

    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }
}
