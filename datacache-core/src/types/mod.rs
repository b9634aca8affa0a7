//! Domain types for datacache.
//!
//! - [`Record`]: one generated dataset row
//! - [`RecordMetadata`]: per-record metadata block
//! - [`Envelope`]: the full response body wrapping all records
//! - [`CacheInfo`]: cache description embedded in the envelope
//! - [`CacheStatus`]: out-of-band hit/miss signal for a single fetch

mod envelope;
mod record;

pub use envelope::*;
pub use record::*;
