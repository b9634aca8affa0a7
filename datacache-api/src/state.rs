//! App state: config, cache backend, memoized generator.

use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use datacache_cache::MemoryStore;
use datacache_core::constants::{DEFAULT_CACHE_KEY, DEFAULT_STORE_TIMEOUT_MS, DEFAULT_TTL_SECONDS};
use datacache_core::error::{DataCacheError, Result};
use datacache_core::traits::CacheStore;
use datacache_generator::{GeneratorConfig, MemoizedGenerator, StoreFailurePolicy};

/// Which cache backend holds the slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CacheBackend {
    /// In-process memory
    #[default]
    Memory,
    /// Redis at `ApiConfig::redis_url`
    Redis,
}

impl FromStr for CacheBackend {
    type Err = DataCacheError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "redis" => Ok(Self::Redis),
            other => Err(DataCacheError::Config(format!(
                "unknown cache backend '{}' (expected 'memory' or 'redis')",
                other
            ))),
        }
    }
}

/// API configuration.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Name of the cache slot
    pub cache_key: String,
    /// Slot lifetime in seconds (positive)
    pub ttl_seconds: u64,
    /// Backend holding the slot
    pub backend: CacheBackend,
    /// Redis connection URL, used when `backend` is `Redis`
    pub redis_url: String,
    /// Upper bound on a single store call
    pub store_timeout_ms: u64,
    /// What to do when the store is unusable
    pub on_store_failure: StoreFailurePolicy,
}

const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            cache_key: DEFAULT_CACHE_KEY.into(),
            ttl_seconds: DEFAULT_TTL_SECONDS,
            backend: CacheBackend::Memory,
            redis_url: DEFAULT_REDIS_URL.into(),
            store_timeout_ms: DEFAULT_STORE_TIMEOUT_MS,
            on_store_failure: StoreFailurePolicy::Degrade,
        }
    }
}

impl ApiConfig {
    /// Reads configuration from the process environment (and `.env`).
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`, falling back to defaults for
    /// unset variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let ttl_seconds = match lookup("CACHE_TTL_SECONDS") {
            Some(v) => parse_u64("CACHE_TTL_SECONDS", &v)?,
            None => defaults.ttl_seconds,
        };
        if ttl_seconds == 0 {
            return Err(DataCacheError::Config("CACHE_TTL_SECONDS must be positive".into()));
        }

        let store_timeout_ms = match lookup("CACHE_STORE_TIMEOUT_MS") {
            Some(v) => parse_u64("CACHE_STORE_TIMEOUT_MS", &v)?,
            None => defaults.store_timeout_ms,
        };

        Ok(Self {
            cache_key: lookup("CACHE_KEY")
                .filter(|k| !k.trim().is_empty())
                .unwrap_or(defaults.cache_key),
            ttl_seconds,
            backend: lookup("CACHE_BACKEND")
                .map(|v| v.parse::<CacheBackend>())
                .transpose()?
                .unwrap_or(defaults.backend),
            redis_url: lookup("REDIS_URL").unwrap_or(defaults.redis_url),
            store_timeout_ms,
            on_store_failure: lookup("CACHE_FAILURE_POLICY")
                .map(|v| v.parse::<StoreFailurePolicy>())
                .transpose()?
                .unwrap_or(defaults.on_store_failure),
        })
    }

    /// Generator settings derived from this config.
    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            cache_key: self.cache_key.clone(),
            ttl: Duration::from_secs(self.ttl_seconds),
            store_timeout: Duration::from_millis(self.store_timeout_ms),
            on_store_failure: self.on_store_failure,
        }
    }

    /// Builds the configured cache backend.
    pub fn build_store(&self) -> Result<Arc<dyn CacheStore>> {
        match self.backend {
            CacheBackend::Memory => Ok(Arc::new(MemoryStore::new())),
            #[cfg(feature = "redis")]
            CacheBackend::Redis => Ok(Arc::new(
                datacache_cache::RedisStore::new(self.redis_url.as_str())?,
            )),
            #[cfg(not(feature = "redis"))]
            CacheBackend::Redis => Err(DataCacheError::Config(
                "CACHE_BACKEND=redis requires the 'redis' feature".into(),
            )),
        }
    }
}

fn parse_u64(name: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| DataCacheError::Config(format!("{} must be an integer, got '{}'", name, value)))
}

/// Shared state behind every handler.
pub struct AppState {
    /// Configuration the state was built from
    pub config: ApiConfig,
    /// Memoized dataset source
    pub generator: MemoizedGenerator,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Builds the backend and generator described by `config`.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let store = config.build_store()?;
        let generator = MemoizedGenerator::new(store, config.generator_config());
        Ok(Self::with_generator(config, generator))
    }

    /// Wraps an already constructed generator.
    pub fn with_generator(config: ApiConfig, generator: MemoizedGenerator) -> Self {
        Self {
            config,
            generator,
            started_at: Instant::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ApiConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.cache_key, "api_data_response");
        assert_eq!(config.ttl_seconds, 300);
        assert_eq!(config.backend, CacheBackend::Memory);
        assert_eq!(config.on_store_failure, StoreFailurePolicy::Degrade);
    }

    #[test]
    fn test_overrides() {
        let config = ApiConfig::from_lookup(lookup(&[
            ("CACHE_KEY", "custom"),
            ("CACHE_TTL_SECONDS", "60"),
            ("CACHE_BACKEND", "Redis"),
            ("REDIS_URL", "redis://cache:6379"),
            ("CACHE_STORE_TIMEOUT_MS", "250"),
            ("CACHE_FAILURE_POLICY", "fail"),
        ]))
        .unwrap();

        assert_eq!(config.cache_key, "custom");
        assert_eq!(config.ttl_seconds, 60);
        assert_eq!(config.backend, CacheBackend::Redis);
        assert_eq!(config.redis_url, "redis://cache:6379");
        assert_eq!(config.on_store_failure, StoreFailurePolicy::Fail);

        let generator = config.generator_config();
        assert_eq!(generator.ttl, Duration::from_secs(60));
        assert_eq!(generator.store_timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(ApiConfig::from_lookup(lookup(&[("CACHE_TTL_SECONDS", "five")])).is_err());
        assert!(ApiConfig::from_lookup(lookup(&[("CACHE_TTL_SECONDS", "0")])).is_err());
        assert!(ApiConfig::from_lookup(lookup(&[("CACHE_BACKEND", "memcached")])).is_err());
        assert!(ApiConfig::from_lookup(lookup(&[("CACHE_FAILURE_POLICY", "retry")])).is_err());
    }

    #[test]
    fn test_memory_backend_builds() {
        let state = AppState::new(ApiConfig::default()).unwrap();
        assert_eq!(state.generator.backend_name(), "memory");
        assert_eq!(state.generator.generations(), 0);
    }

    #[cfg(not(feature = "redis"))]
    #[test]
    fn test_redis_backend_requires_feature() {
        let config = ApiConfig {
            backend: CacheBackend::Redis,
            ..ApiConfig::default()
        };
        assert!(matches!(config.build_store(), Err(DataCacheError::Config(_))));
    }
}
