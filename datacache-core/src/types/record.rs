//! Generated dataset records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single generated dataset row.
///
/// Every field except `id` is derived from `id` and the generation
/// timestamp, so two generations differ only in their timestamps.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Record id, `1..=RECORD_COUNT`
    pub id: u32,
    /// Display name (`Item {id}`)
    pub name: String,
    /// Free-text description (`Description for item {id}`)
    pub description: String,
    /// Generation timestamp, shared by all records of one generation
    pub timestamp: DateTime<Utc>,
    /// `Category {(id % 10) + 1}`
    pub category: String,
    /// `id * 1.5`
    pub value: f64,
    /// True for even ids
    pub active: bool,
    /// `tag1 ..= tag{(id % 5) + 1}`
    pub tags: Vec<String>,
    /// Metadata block
    pub metadata: RecordMetadata,
}

/// Metadata attached to each record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMetadata {
    /// Same instant as the record's `timestamp`
    pub created_at: DateTime<Utc>,
    /// Payload schema version
    pub version: String,
    /// `(id % 3) + 1`
    pub priority: u32,
}
