//! smallcache - memory-optimized store of sparse per-entity attribute sets
//!
//! This crate re-exports both layers of the system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 1: smallcache_storage    - Schema, sparse entities, cache, transactions, pages, stats
//! Layer 0: smallcache_foundation - Values, string pool, errors
//! ```

pub use smallcache_foundation as foundation;
pub use smallcache_storage as storage;

pub use smallcache_foundation::{Error, ErrorKind, PlainValue, Result, to_display_string};
pub use smallcache_storage::{Cache, CacheConfig, SweepReport};
