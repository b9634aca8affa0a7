//! # datacache Generator
//!
//! Produces the 1000-record dataset and memoizes it behind a single cache slot.
//!
//! ## Overview
//!
//! - [`generate_envelope`]: pure, deterministic payload construction
//! - [`MemoizedGenerator`]: the cache-or-generate decision path, with
//!   single-flight regeneration and an explicit backend-outage policy
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use datacache_cache::MemoryStore;
//! use datacache_generator::{GeneratorConfig, MemoizedGenerator};
//!
//! let generator = MemoizedGenerator::new(Arc::new(MemoryStore::new()), GeneratorConfig::default());
//! let fetched = generator.fetch_or_generate().await?;
//! println!("{} records, {}", fetched.envelope.total_count, fetched.status);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod generate;
pub mod memo;

pub use generate::{build_record, generate_envelope, generate_records};
pub use memo::{Fetched, GeneratorConfig, MemoizedGenerator, StoreFailurePolicy};
