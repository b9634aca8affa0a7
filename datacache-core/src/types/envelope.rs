//! Response envelope and cache descriptors.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Record;

/// The full response body: generated records plus generation metadata.
///
/// An envelope is immutable once generated. A cache hit returns the stored
/// envelope byte-for-byte, so `generated_at` is the only field that tells
/// one generation from the next.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Generated records in ascending id order
    pub data: Vec<Record>,
    /// Always equal to `data.len()`
    pub total_count: usize,
    /// Instant the payload was generated
    pub generated_at: DateTime<Utc>,
    /// Cache description recorded at generation time
    pub cache_info: CacheInfo,
}

impl Envelope {
    /// Wraps `data` generated at `generated_at`.
    pub fn new(data: Vec<Record>, generated_at: DateTime<Utc>, cache_info: CacheInfo) -> Self {
        Self {
            total_count: data.len(),
            data,
            generated_at,
            cache_info,
        }
    }

    /// Checks the shape invariants: count matches and every record
    /// carries the envelope's generation timestamp.
    pub fn is_consistent(&self) -> bool {
        self.total_count == self.data.len()
            && self.data.iter().all(|r| {
                r.timestamp == self.generated_at && r.metadata.created_at == self.generated_at
            })
    }
}

/// Cache description embedded in the envelope.
///
/// `cached` records whether the payload was served from cache *at
/// generation time*, which is always `false`. It is not rewritten on later
/// hits; use [`CacheStatus`] for the per-request answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheInfo {
    /// Stored flag, `false` for every generated envelope
    pub cached: bool,
    /// Key of the cache slot
    pub cache_key: String,
    /// TTL the envelope was stored with
    pub ttl_seconds: u64,
}

impl CacheInfo {
    /// Cache info for a freshly generated envelope.
    pub fn fresh(cache_key: impl Into<String>, ttl_seconds: u64) -> Self {
        Self {
            cached: false,
            cache_key: cache_key.into(),
            ttl_seconds,
        }
    }
}

/// How a single fetch was satisfied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CacheStatus {
    /// Served from an unexpired cache slot.
    Hit,
    /// Slot was empty or expired; regenerated and stored.
    Miss,
    /// Backend unavailable; regenerated without caching.
    Bypass,
}

impl CacheStatus {
    /// Header value for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
            CacheStatus::Bypass => "BYPASS",
        }
    }
}

impl fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecordMetadata;
    use chrono::TimeZone;
    use test_case::test_case;

    fn record(id: u32, at: DateTime<Utc>) -> Record {
        Record {
            id,
            name: format!("Item {}", id),
            description: format!("Description for item {}", id),
            timestamp: at,
            category: "Category 1".into(),
            value: id as f64 * 1.5,
            active: id % 2 == 0,
            tags: vec!["tag1".into()],
            metadata: RecordMetadata {
                created_at: at,
                version: "1.0".into(),
                priority: 1,
            },
        }
    }

    #[test]
    fn test_envelope_counts_records() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let env = Envelope::new(
            vec![record(1, at), record(2, at)],
            at,
            CacheInfo::fresh("k", 300),
        );
        assert_eq!(env.total_count, 2);
        assert!(env.is_consistent());
    }

    #[test]
    fn test_envelope_detects_mixed_timestamps() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 1).unwrap();
        let env = Envelope::new(vec![record(1, at), record(2, later)], at, CacheInfo::fresh("k", 300));
        assert!(!env.is_consistent());
    }

    #[test]
    fn test_envelope_json_field_names() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let env = Envelope::new(vec![record(1, at)], at, CacheInfo::fresh("api_data_response", 300));
        let json = serde_json::to_value(&env).unwrap();

        assert_eq!(json["total_count"], 1);
        assert_eq!(json["generated_at"], "2024-01-01T00:00:00Z");
        assert_eq!(json["cache_info"]["cached"], false);
        assert_eq!(json["cache_info"]["cache_key"], "api_data_response");
        assert_eq!(json["cache_info"]["ttl_seconds"], 300);
        assert_eq!(json["data"][0]["metadata"]["created_at"], "2024-01-01T00:00:00Z");
    }

    #[test_case(CacheStatus::Hit, "HIT" ; "hit")]
    #[test_case(CacheStatus::Miss, "MISS" ; "miss")]
    #[test_case(CacheStatus::Bypass, "BYPASS" ; "bypass")]
    fn test_cache_status(status: CacheStatus, header: &str) {
        assert_eq!(status.as_str(), header);
        assert_eq!(status.to_string(), header);
    }
}
