//! A backend that is never reachable.
//!
//! Stands in for a downed cache server so the generator's outage policy can
//! be exercised without network setup.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use datacache_core::error::{DataCacheError, Result};
use datacache_core::traits::CacheStore;
use datacache_core::types::Envelope;

/// Cache store whose every call fails with `CacheUnavailable`.
#[derive(Debug, Default)]
pub struct UnreachableStore {
    attempts: AtomicU64,
}

impl UnreachableStore {
    /// Creates a new unreachable store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of calls made against this store.
    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::Relaxed)
    }

    fn refuse(&self, op: &str) -> DataCacheError {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        DataCacheError::CacheUnavailable(format!("{}: connection refused", op))
    }
}

#[async_trait]
impl CacheStore for UnreachableStore {
    async fn get(&self, _key: &str) -> Result<Option<Arc<Envelope>>> {
        Err(self.refuse("GET"))
    }

    async fn set(&self, _key: &str, _value: Arc<Envelope>, _ttl: Duration) -> Result<()> {
        Err(self.refuse("SET"))
    }

    async fn invalidate(&self, _key: &str) -> Result<()> {
        Err(self.refuse("DEL"))
    }

    fn backend_name(&self) -> &'static str {
        "unreachable"
    }
}
