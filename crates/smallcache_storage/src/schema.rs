//! Attribute schema: the fixed name/ordinal mapping of a cache.
//!
//! The schema is built once from the attribute names a cache is constructed
//! with and never changes afterwards.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use smallcache_foundation::{Error, Result};

use crate::entity::PresenceMask;

/// Maximum number of attributes a schema can hold.
pub const MAX_ATTRIBUTES: usize = PresenceMask::BITS;

/// Zero-based index assigned to an attribute name.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Ordinal(pub(crate) u8);

impl Ordinal {
    /// Creates an ordinal, or `None` if it cannot fit a schema.
    #[must_use]
    pub fn new(index: usize) -> Option<Self> {
        if index < MAX_ATTRIBUTES {
            u8::try_from(index).ok().map(Self)
        } else {
            None
        }
    }

    /// Returns the raw index of this ordinal.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for Ordinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ordinal({})", self.0)
    }
}

/// Bidirectional attribute name/ordinal mapping.
///
/// Ordinals are positions in the construction list. A repeated name keeps
/// the ordinal of its first occurrence; later positions still count towards
/// [`AttributeSchema::len`] but are unreachable by name.
#[derive(Clone, Debug)]
pub struct AttributeSchema {
    /// Names by ordinal, duplicates included.
    names: Vec<Arc<str>>,
    /// Map from name to its first ordinal.
    ordinals: HashMap<Arc<str>, Ordinal>,
}

impl AttributeSchema {
    /// Builds a schema from attribute names.
    ///
    /// # Errors
    ///
    /// Returns a schema error if `names` is empty or longer than
    /// [`MAX_ATTRIBUTES`].
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<Arc<str>> = names.into_iter().map(|n| Arc::from(n.as_ref())).collect();

        if names.is_empty() {
            return Err(Error::empty_schema());
        }
        if names.len() > MAX_ATTRIBUTES {
            return Err(Error::too_many_attributes(names.len(), MAX_ATTRIBUTES));
        }

        let mut ordinals = HashMap::with_capacity(names.len());
        for (index, name) in names.iter().enumerate() {
            // Bounded by the length check above.
            let Some(ordinal) = Ordinal::new(index) else {
                return Err(Error::too_many_attributes(names.len(), MAX_ATTRIBUTES));
            };
            ordinals.entry(Arc::clone(name)).or_insert(ordinal);
        }

        Ok(Self { names, ordinals })
    }

    /// Returns the ordinal for a name, if the schema has it.
    #[must_use]
    pub fn ordinal(&self, name: &str) -> Option<Ordinal> {
        self.ordinals.get(name).copied()
    }

    /// Returns the name at an ordinal.
    #[must_use]
    pub fn name(&self, ordinal: Ordinal) -> Option<&str> {
        self.names.get(ordinal.index()).map(AsRef::as_ref)
    }

    /// Returns the size of the ordinal space.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false; a schema holds at least one attribute.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterates over names in ordinal order, duplicates included.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.iter().map(AsRef::as_ref)
    }

    /// Returns true if some name was supplied more than once.
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        self.ordinals.len() != self.names.len()
    }
}
