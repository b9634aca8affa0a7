//! Service constants.
//!
//! These mirror the deployed endpoint: one well-known cache key, a five minute
//! TTL and a fixed-size payload of one thousand records.

// ═══════════════════════════════════════════════════════════════════════════════
// CACHE SLOT
// ═══════════════════════════════════════════════════════════════════════════════

/// Key of the single cache slot holding the generated envelope.
pub const DEFAULT_CACHE_KEY: &str = "api_data_response";

/// Time-to-live of the cache slot in seconds (5 minutes).
pub const DEFAULT_TTL_SECONDS: u64 = 300;

/// Upper bound for a single cache backend call, in milliseconds.
pub const DEFAULT_STORE_TIMEOUT_MS: u64 = 2_000;

// ═══════════════════════════════════════════════════════════════════════════════
// PAYLOAD SHAPE
// ═══════════════════════════════════════════════════════════════════════════════

/// Number of records in every generated payload.
pub const RECORD_COUNT: u32 = 1000;

/// Number of distinct categories (`Category 1` .. `Category 10`).
pub const CATEGORY_COUNT: u32 = 10;

/// Multiplier applied to the record id to obtain its `value`.
pub const VALUE_FACTOR: f64 = 1.5;

/// Tags per record cycle through `1..=TAG_CYCLE`.
pub const TAG_CYCLE: u32 = 5;

/// Priorities cycle through `1..=PRIORITY_CYCLE`.
pub const PRIORITY_CYCLE: u32 = 3;

/// Schema version stamped into every record's metadata.
pub const PAYLOAD_VERSION: &str = "1.0";

// ═══════════════════════════════════════════════════════════════════════════════
// DIAGNOSTICS
// ═══════════════════════════════════════════════════════════════════════════════

/// Message emitted once per actual regeneration.
pub const GENERATING_MESSAGE: &str = "Generating data";

/// Response header carrying the out-of-band hit/miss status.
pub const CACHE_STATUS_HEADER: &str = "x-cache";
