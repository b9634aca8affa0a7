//! Deterministic payload generation.
//!
//! Every record field is a function of the record id and one shared
//! timestamp. Generation does no I/O and cannot fail.

use chrono::{DateTime, SubsecRound, Utc};

use datacache_core::constants::{
    CATEGORY_COUNT, PAYLOAD_VERSION, PRIORITY_CYCLE, RECORD_COUNT, TAG_CYCLE, VALUE_FACTOR,
};
use datacache_core::types::{CacheInfo, Envelope, Record, RecordMetadata};

/// Builds the record with the given id, stamped with `at`.
pub fn build_record(id: u32, at: DateTime<Utc>) -> Record {
    let tag_count = (id % TAG_CYCLE) + 1;

    Record {
        id,
        name: format!("Item {}", id),
        description: format!("Description for item {}", id),
        timestamp: at,
        category: format!("Category {}", (id % CATEGORY_COUNT) + 1),
        value: f64::from(id) * VALUE_FACTOR,
        active: id % 2 == 0,
        tags: (1..=tag_count).map(|j| format!("tag{}", j)).collect(),
        metadata: RecordMetadata {
            created_at: at,
            version: PAYLOAD_VERSION.to_string(),
            priority: (id % PRIORITY_CYCLE) + 1,
        },
    }
}

/// Builds all records (ids `1..=RECORD_COUNT`) stamped with `at`.
pub fn generate_records(at: DateTime<Utc>) -> Vec<Record> {
    (1..=RECORD_COUNT).map(|id| build_record(id, at)).collect()
}

/// Generates a complete envelope as of `now`.
///
/// `now` is truncated to microseconds once and shared by the envelope and
/// every record in it.
pub fn generate_envelope(now: DateTime<Utc>, cache_key: &str, ttl_seconds: u64) -> Envelope {
    let at = now.trunc_subsecs(6);
    Envelope::new(
        generate_records(at),
        at,
        CacheInfo::fresh(cache_key, ttl_seconds),
    )
}
