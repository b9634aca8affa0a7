//! Redis-backed cache store.
//!
//! Envelopes are stored as JSON under `SET key value EX ttl`, so expiry is
//! enforced by Redis itself and shared across every process pointing at the
//! same server.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use deadpool_redis::{Config as PoolConfig, Connection, Pool, Runtime};
use redis::AsyncCommands;
use tracing::{debug, warn};

use datacache_core::error::{DataCacheError, Result};
use datacache_core::traits::CacheStore;
use datacache_core::types::Envelope;

/// Redis cache store with connection pooling.
#[derive(Clone)]
pub struct RedisStore {
    pool: Pool,
    key_prefix: String,
}

impl RedisStore {
    /// Creates a store for the server at `connection_url`.
    ///
    /// No connection is opened until the first command.
    pub fn new(connection_url: impl Into<String>) -> Result<Self> {
        let pool = PoolConfig::from_url(connection_url.into())
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| DataCacheError::Config(format!("Failed to create Redis pool: {}", e)))?;

        Ok(Self {
            pool,
            key_prefix: String::new(),
        })
    }

    /// Namespaces every key as `{prefix}:{key}`.
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    fn build_key(&self, key: &str) -> String {
        if self.key_prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}:{}", self.key_prefix, key)
        }
    }

    async fn connection(&self) -> Result<Connection> {
        self.pool.get().await.map_err(|e| {
            warn!(error = %e, "Redis pool exhausted or unreachable");
            DataCacheError::CacheUnavailable(format!("Failed to get Redis connection: {}", e))
        })
    }
}

/// Decodes a stored envelope. An undecodable value reads as a miss so the
/// next generation overwrites it.
fn decode_entry(full_key: &str, bytes: &[u8]) -> Option<Arc<Envelope>> {
    match serde_json::from_slice(bytes) {
        Ok(envelope) => Some(Arc::new(envelope)),
        Err(e) => {
            warn!(key = %full_key, error = %e, "Discarding undecodable cache entry");
            None
        }
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<Arc<Envelope>>> {
        let full_key = self.build_key(key);
        let mut conn = self.connection().await?;

        let value: Option<Vec<u8>> = conn
            .get(&full_key)
            .await
            .map_err(|e| DataCacheError::CacheUnavailable(format!("GET failed: {}", e)))?;

        Ok(value.and_then(|bytes| decode_entry(&full_key, &bytes)))
    }

    async fn set(&self, key: &str, value: Arc<Envelope>, ttl: Duration) -> Result<()> {
        let full_key = self.build_key(key);
        let serialized = serde_json::to_vec(value.as_ref())?;
        // EX 0 is rejected by Redis.
        let seconds = ttl.as_secs().max(1);

        let mut conn = self.connection().await?;
        let _: () = conn
            .set_ex(&full_key, serialized, seconds)
            .await
            .map_err(|e| DataCacheError::CacheUnavailable(format!("SET failed: {}", e)))?;

        debug!(key = %full_key, ttl_seconds = seconds, "Stored cache entry in Redis");
        Ok(())
    }

    async fn invalidate(&self, key: &str) -> Result<()> {
        let full_key = self.build_key(key);
        let mut conn = self.connection().await?;
        let _: () = conn
            .del(&full_key)
            .await
            .map_err(|e| DataCacheError::CacheUnavailable(format!("DEL failed: {}", e)))?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datacache_core::types::CacheInfo;

    #[test]
    fn test_build_key_with_prefix() {
        let store = RedisStore::new("redis://127.0.0.1:6379")
            .unwrap()
            .with_key_prefix("datacache");
        assert_eq!(store.build_key("api_data_response"), "datacache:api_data_response");
    }

    #[test]
    fn test_undecodable_entry_reads_as_miss() {
        assert!(decode_entry("api_data_response", b"not json").is_none());
        assert!(decode_entry("api_data_response", br#"{"data":[]}"#).is_none());
    }

    #[test]
    fn test_stored_entry_decodes() {
        let now = chrono::Utc::now();
        let envelope = Envelope::new(Vec::new(), now, CacheInfo::fresh("api_data_response", 300));
        let bytes = serde_json::to_vec(&envelope).unwrap();

        let decoded = decode_entry("api_data_response", &bytes).unwrap();
        assert_eq!(decoded.cache_info.cache_key, "api_data_response");
    }

    #[test]
    fn test_build_key_without_prefix() {
        let store = RedisStore::new("redis://127.0.0.1:6379").unwrap();
        assert_eq!(store.build_key("api_data_response"), "api_data_response");
    }
}
