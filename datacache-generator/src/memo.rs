//! The memoized cache-or-generate path.
//!
//! [`MemoizedGenerator`] owns one cache slot. Each call either returns the
//! slot's unexpired envelope or generates a fresh one, stores it with a
//! fresh TTL, and returns it.
//!
//! # Regeneration policy
//!
//! Lookups run unlocked, so hits and failed lookups proceed concurrently and
//! each is bounded by the store timeout alone. A miss takes an async mutex
//! and looks again before generating, so N callers racing on an empty or
//! expired slot trigger exactly one generation and all receive the same
//! envelope.
//!
//! # Backend outages
//!
//! Store calls are bounded by [`GeneratorConfig::store_timeout`]. A failed or
//! timed-out call is handled per [`StoreFailurePolicy`].

use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use datacache_core::clock::{Clock, SystemClock};
use datacache_core::constants::{
    DEFAULT_CACHE_KEY, DEFAULT_STORE_TIMEOUT_MS, DEFAULT_TTL_SECONDS, GENERATING_MESSAGE,
};
use datacache_core::error::{DataCacheError, Result};
use datacache_core::traits::CacheStore;
use datacache_core::types::{CacheStatus, Envelope};

use crate::generate::generate_envelope;

/// What to do when the cache backend cannot be reached.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StoreFailurePolicy {
    /// Serve a freshly generated envelope without caching it.
    #[default]
    Degrade,
    /// Fail the request with `CacheUnavailable`.
    Fail,
}

impl FromStr for StoreFailurePolicy {
    type Err = DataCacheError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "degrade" => Ok(Self::Degrade),
            "fail" => Ok(Self::Fail),
            other => Err(DataCacheError::Config(format!(
                "unknown cache failure policy '{}' (expected 'degrade' or 'fail')",
                other
            ))),
        }
    }
}

impl fmt::Display for StoreFailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Degrade => f.write_str("degrade"),
            Self::Fail => f.write_str("fail"),
        }
    }
}

/// Generator configuration.
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    /// Key of the cache slot
    pub cache_key: String,
    /// Lifetime of a stored envelope
    pub ttl: Duration,
    /// Upper bound for each store call
    pub store_timeout: Duration,
    /// Behavior when the store fails
    pub on_store_failure: StoreFailurePolicy,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            cache_key: DEFAULT_CACHE_KEY.to_string(),
            ttl: Duration::from_secs(DEFAULT_TTL_SECONDS),
            store_timeout: Duration::from_millis(DEFAULT_STORE_TIMEOUT_MS),
            on_store_failure: StoreFailurePolicy::default(),
        }
    }
}

/// Result of a single fetch.
#[derive(Clone, Debug)]
pub struct Fetched {
    /// The envelope to serve, unchanged from what was stored
    pub envelope: Arc<Envelope>,
    /// How this fetch was satisfied
    pub status: CacheStatus,
}

/// Memoizes the generated envelope behind one cache slot.
pub struct MemoizedGenerator {
    store: Arc<dyn CacheStore>,
    clock: Arc<dyn Clock>,
    config: GeneratorConfig,
    flight: Mutex<()>,
    generations: AtomicU64,
}

impl MemoizedGenerator {
    /// Creates a generator over `store` using the system clock.
    pub fn new(store: Arc<dyn CacheStore>, config: GeneratorConfig) -> Self {
        Self::with_clock(store, Arc::new(SystemClock), config)
    }

    /// Creates a generator over `store` reading time from `clock`.
    ///
    /// `clock` stamps generated envelopes. Expiry is the store's business.
    pub fn with_clock(
        store: Arc<dyn CacheStore>,
        clock: Arc<dyn Clock>,
        config: GeneratorConfig,
    ) -> Self {
        Self {
            store,
            clock,
            config,
            flight: Mutex::new(()),
            generations: AtomicU64::new(0),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Name of the backing store.
    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    /// Number of regenerations performed so far.
    pub fn generations(&self) -> u64 {
        self.generations.load(Ordering::SeqCst)
    }

    /// Returns the cached envelope, or generates, stores and returns a new one.
    #[instrument(skip(self), fields(cache_key = %self.config.cache_key))]
    pub async fn fetch_or_generate(&self) -> Result<Fetched> {
        let key = self.config.cache_key.as_str();

        // Hits and failed lookups never wait on the flight lock.
        if let Some(fetched) = self.lookup(key).await? {
            return Ok(fetched);
        }

        let _flight = self.flight.lock().await;

        // Another caller may have refilled the slot while we waited.
        if let Some(fetched) = self.lookup(key).await? {
            return Ok(fetched);
        }

        let envelope = Arc::new(self.generate());
        let stored = self
            .bounded("SET", self.store.set(key, Arc::clone(&envelope), self.config.ttl))
            .await;

        match stored {
            Ok(()) => Ok(Fetched {
                envelope,
                status: CacheStatus::Miss,
            }),
            Err(err) => match self.config.on_store_failure {
                StoreFailurePolicy::Degrade => {
                    warn!(error = %err, "Cache store failed, serving uncached envelope");
                    Ok(Fetched {
                        envelope,
                        status: CacheStatus::Bypass,
                    })
                }
                StoreFailurePolicy::Fail => Err(err),
            },
        }
    }

    /// Reads the slot. `Some` is a finished fetch: a hit, or an uncached
    /// envelope after a failed lookup under `Degrade`.
    async fn lookup(&self, key: &str) -> Result<Option<Fetched>> {
        match self.bounded("GET", self.store.get(key)).await {
            Ok(Some(envelope)) => {
                debug!(generated_at = %envelope.generated_at, "Cache hit");
                Ok(Some(Fetched {
                    envelope,
                    status: CacheStatus::Hit,
                }))
            }
            Ok(None) => Ok(None),
            Err(err) => self.serve_uncached(err).map(Some),
        }
    }

    /// Handles a failed lookup according to the configured policy.
    fn serve_uncached(&self, err: DataCacheError) -> Result<Fetched> {
        match self.config.on_store_failure {
            StoreFailurePolicy::Degrade => {
                warn!(error = %err, "Cache lookup failed, serving uncached envelope");
                Ok(Fetched {
                    envelope: Arc::new(self.generate()),
                    status: CacheStatus::Bypass,
                })
            }
            StoreFailurePolicy::Fail => Err(err),
        }
    }

    /// Runs the generator and emits the regeneration signal.
    fn generate(&self) -> Envelope {
        let envelope = generate_envelope(
            self.clock.now(),
            &self.config.cache_key,
            self.config.ttl.as_secs(),
        );
        self.generations.fetch_add(1, Ordering::SeqCst);
        info!(
            cache_key = %self.config.cache_key,
            generated_at = %envelope.generated_at,
            "{}",
            GENERATING_MESSAGE
        );
        envelope
    }

    async fn bounded<T>(&self, op: &str, call: impl Future<Output = Result<T>>) -> Result<T> {
        match tokio::time::timeout(self.config.store_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(DataCacheError::CacheUnavailable(format!(
                "{} timed out after {}ms",
                op,
                self.config.store_timeout.as_millis()
            ))),
        }
    }
}
