//! Content-addressed string pool.
//!
//! Categorical attribute values repeat heavily across entities. Every string
//! stored in the cache goes through a [`StringPool`] so that equal content
//! shares one reference-counted allocation.

use std::collections::HashSet;
use std::sync::Arc;

/// Shared handle to a pooled string.
///
/// Two handles obtained from the same pool for equal content point at the
/// same allocation (`Arc::ptr_eq` holds).
pub type InternedStr = Arc<str>;

/// Pool of interned strings.
///
/// The pool keeps one handle per distinct content. Entities hold clones of
/// those handles, so a string lives as long as its longest-lived user, or
/// until [`StringPool::purge_unused`] drops the pool's own reference.
/// It is not thread-safe; use external synchronization if needed.
#[derive(Clone, Debug, Default)]
pub struct StringPool {
    strings: HashSet<InternedStr>,
}

impl StringPool {
    /// Creates a new empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a string slice, returning the shared handle for its content.
    pub fn intern(&mut self, s: &str) -> InternedStr {
        if let Some(existing) = self.strings.get(s) {
            return Arc::clone(existing);
        }

        let handle: InternedStr = s.into();
        self.strings.insert(Arc::clone(&handle));
        handle
    }

    /// Interns an owned string, reusing its buffer when the content is new.
    pub fn intern_owned(&mut self, s: String) -> InternedStr {
        if let Some(existing) = self.strings.get(s.as_str()) {
            return Arc::clone(existing);
        }

        let handle: InternedStr = Arc::from(s.into_boxed_str());
        self.strings.insert(Arc::clone(&handle));
        handle
    }

    /// Returns the pooled handle for `s` without inserting it.
    #[must_use]
    pub fn get(&self, s: &str) -> Option<&InternedStr> {
        self.strings.get(s)
    }

    /// Returns true if `s` is pooled.
    #[must_use]
    pub fn contains(&self, s: &str) -> bool {
        self.strings.contains(s)
    }

    /// Returns the number of distinct pooled strings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Returns true if nothing is pooled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Iterates over pooled strings in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.strings.iter().map(AsRef::as_ref)
    }

    /// Drops every string that only the pool still references.
    ///
    /// Returns the number of strings removed.
    pub fn purge_unused(&mut self) -> usize {
        let before = self.strings.len();
        self.strings.retain(|s| Arc::strong_count(s) > 1);
        before - self.strings.len()
    }
}
