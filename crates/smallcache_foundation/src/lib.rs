//! Attribute values, string interning, and error types for smallcache.
//!
//! This crate provides:
//! - [`PlainValue`] - Caller-facing attribute values
//! - [`AttributeValue`] - Compact stored values with interned strings
//! - [`WireValue`] - Values as decoded from a bulk payload
//! - [`StringPool`] - Content-addressed string sharing
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod intern;
pub mod value;

pub use error::{Error, ErrorContext, ErrorKind, SchemaViolation, StateViolation};
pub use intern::{InternedStr, StringPool};
pub use value::{AttributeValue, PlainValue, ValueKind, WireValue, to_display_string};

/// Result type for smallcache operations.
pub type Result<T> = std::result::Result<T, Error>;
