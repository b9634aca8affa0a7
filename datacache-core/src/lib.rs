//! # datacache Core
//!
//! Core types, errors, and traits for the memoized dataset service.
//!
//! This crate provides the building blocks shared by every other datacache crate:
//!
//! - **Types**: the generated [`Record`]s and the [`Envelope`] that wraps them
//! - **Errors**: [`DataCacheError`] and the crate-wide [`Result`] alias
//! - **Constants**: cache key, TTL and payload shape defaults
//! - **Traits**: the [`CacheStore`] backend seam
//! - **Clock**: injectable time source so TTL expiry is testable
//!
//! ## Example
//!
//! ```rust
//! use datacache_core::{CacheInfo, DEFAULT_CACHE_KEY, DEFAULT_TTL_SECONDS};
//!
//! let info = CacheInfo::fresh(DEFAULT_CACHE_KEY, DEFAULT_TTL_SECONDS);
//! assert!(!info.cached);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod clock;
pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use clock::{Clock, ManualClock, SystemClock};
pub use constants::*;
pub use error::{DataCacheError, Result};
pub use traits::*;
pub use types::*;
