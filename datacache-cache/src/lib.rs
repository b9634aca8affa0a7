//! # datacache Cache
//!
//! Backends for the single cache slot.
//!
//! - **Memory**: in-process slot store, expiry driven by an injectable clock
//! - **Redis**: shared store using `SET .. EX` (feature `redis`)
//! - **Unreachable**: a backend that always fails, for exercising outage policies
//!
//! ## Example
//!
//! ```rust,ignore
//! use datacache_cache::MemoryStore;
//! use datacache_core::CacheStore;
//!
//! let store = MemoryStore::new();
//! store.set("api_data_response", envelope, Duration::from_secs(300)).await?;
//! let hit = store.get("api_data_response").await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod memory;
#[cfg(feature = "redis")]
mod redis_store;
mod unreachable;

pub use memory::{MemoryStore, StoreStats};
#[cfg(feature = "redis")]
pub use redis_store::RedisStore;
pub use unreachable::UnreachableStore;

// Re-export the trait from core
pub use datacache_core::traits::CacheStore;
