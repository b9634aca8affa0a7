//! In-memory TTL store for generated envelopes.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::{debug, instrument};

use datacache_core::clock::{Clock, SystemClock};
use datacache_core::error::Result;
use datacache_core::traits::CacheStore;
use datacache_core::types::Envelope;

/// Cache entry with TTL.
#[derive(Clone)]
struct CacheEntry {
    value: Arc<Envelope>,
    stored_at: DateTime<Utc>,
    ttl: Duration,
}

impl CacheEntry {
    /// An entry is gone once `now - stored_at >= ttl`.
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match (now - self.stored_at).to_std() {
            Ok(age) => age >= self.ttl,
            // Clock went backwards: still fresh.
            Err(_) => false,
        }
    }
}

/// In-process cache store.
///
/// Thread-safe; expiry is evaluated lazily on read against the injected
/// [`Clock`]. Expired entries stay in the map until overwritten or
/// [`cleanup_expired`](Self::cleanup_expired) runs.
pub struct MemoryStore {
    entries: RwLock<HashMap<String, CacheEntry>>,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    /// Creates an empty store using the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty store that reads time from `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Removes all expired entries.
    pub fn cleanup_expired(&self) {
        let now = self.clock.now();
        self.entries.write().retain(|_, e| !e.is_expired(now));
    }

    /// Clears all entries.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Returns the number of entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Returns store statistics.
    pub fn stats(&self) -> StoreStats {
        let now = self.clock.now();
        let entries = self.entries.read();
        let expired = entries.values().filter(|e| e.is_expired(now)).count();
        StoreStats {
            total_entries: entries.len(),
            expired_entries: expired,
            valid_entries: entries.len().saturating_sub(expired),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    #[instrument(skip(self), level = "trace")]
    async fn get(&self, key: &str) -> Result<Option<Arc<Envelope>>> {
        let now = self.clock.now();
        let entries = self.entries.read();
        Ok(entries.get(key).and_then(|e| {
            if e.is_expired(now) {
                None
            } else {
                Some(Arc::clone(&e.value))
            }
        }))
    }

    #[instrument(skip(self, value), level = "trace")]
    async fn set(&self, key: &str, value: Arc<Envelope>, ttl: Duration) -> Result<()> {
        let entry = CacheEntry {
            value,
            stored_at: self.clock.now(),
            ttl,
        };
        self.entries.write().insert(key.to_owned(), entry);
        debug!(key, ttl_seconds = ttl.as_secs(), "Stored cache entry");
        Ok(())
    }

    async fn invalidate(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

/// Store statistics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreStats {
    /// Entries held, expired or not
    pub total_entries: usize,
    /// Entries past their TTL awaiting cleanup
    pub expired_entries: usize,
    /// Entries that would be served as hits
    pub valid_entries: usize,
}
