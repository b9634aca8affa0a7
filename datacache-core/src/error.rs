//! Error types for datacache.
//!
//! The core has very few failure modes: generation is pure computation, so
//! almost everything that can go wrong happens at the cache backend.

use thiserror::Error;

/// Result type alias using `DataCacheError`.
pub type Result<T> = std::result::Result<T, DataCacheError>;

/// Main error type for all datacache operations.
#[derive(Debug, Error)]
pub enum DataCacheError {
    // ═══════════════════════════════════════════════════════════════════════════
    // CACHE BACKEND ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The cache backend is unreachable, timed out, or rejected the command.
    #[error("Cache unavailable: {0}")]
    CacheUnavailable(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // REQUEST ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Request used a method other than GET.
    #[error("Method not allowed: {0}")]
    InvalidMethod(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // SERIALIZATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),

    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DataCacheError {
    /// Returns true if the error originates from the cache backend.
    pub fn is_cache_error(&self) -> bool {
        matches!(self, DataCacheError::CacheUnavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DataCacheError::CacheUnavailable("connection refused".into());
        assert_eq!(err.to_string(), "Cache unavailable: connection refused");

        let err = DataCacheError::InvalidMethod("POST".into());
        assert_eq!(err.to_string(), "Method not allowed: POST");
    }

    #[test]
    fn test_error_classification() {
        assert!(DataCacheError::CacheUnavailable("x".into()).is_cache_error());
        assert!(!DataCacheError::InvalidMethod("PUT".into()).is_cache_error());
        assert!(!DataCacheError::Config("bad ttl".into()).is_cache_error());
    }

    #[test]
    fn test_from_serde_json() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: DataCacheError = json_err.into();
        assert!(matches!(err, DataCacheError::Serialization(_)));
    }
}
