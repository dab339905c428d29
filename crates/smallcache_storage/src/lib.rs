//! Sparse entity storage, generational transactions, and page loading for smallcache.
//!
//! This crate provides:
//! - [`AttributeSchema`] - Fixed attribute name/ordinal mapping
//! - [`SparseEntity`] - Presence mask plus densely packed values
//! - [`TransactionManager`] - Refresh generations and stale-entity sweep
//! - [`Cache`] - Entity id to attribute set, with bulk page loading
//! - [`CacheStats`] - Memory and usage introspection

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cache;
pub mod config;
pub mod entity;
pub mod page;
pub mod schema;
pub mod stats;
pub mod transaction;

pub use cache::Cache;
pub use config::CacheConfig;
pub use entity::{PresenceMask, SparseEntity};
pub use page::{AttributeRecord, ItemRecord, PageResponse, PageResult, Pagination, parse_page};
pub use schema::{AttributeSchema, MAX_ATTRIBUTES, Ordinal};
pub use stats::{CacheStats, KindStats, human_readable_size};
pub use transaction::{OpenTransaction, SweepReport, TransactionManager, TransactionState};
