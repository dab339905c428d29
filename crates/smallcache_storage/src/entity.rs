//! Sparse per-entity attribute storage.
//!
//! Each entity keeps a fixed-width presence mask (one bit per ordinal) and a
//! dense array holding only the present values in ascending ordinal order.
//! A value's slot in the dense array is the number of set bits below its
//! ordinal, computed with one popcount per mask word.

use smallcache_foundation::AttributeValue;

use crate::schema::Ordinal;

/// Fixed-width bit vector of attribute presence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PresenceMask {
    words: [u32; PresenceMask::WORDS],
}

impl PresenceMask {
    /// Bits per mask word.
    pub const WORD_BITS: usize = u32::BITS as usize;

    /// Number of mask words.
    pub const WORDS: usize = 3;

    /// Total number of ordinals the mask can hold.
    pub const BITS: usize = Self::WORDS * Self::WORD_BITS;

    /// Creates an empty mask.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            words: [0; Self::WORDS],
        }
    }

    const fn split(ordinal: Ordinal) -> (usize, usize) {
        let index = ordinal.index();
        (index / Self::WORD_BITS, index % Self::WORD_BITS)
    }

    /// Clears every bit.
    pub fn clear(&mut self) {
        self.words = [0; Self::WORDS];
    }

    /// Sets the bit for `ordinal`.
    pub fn set(&mut self, ordinal: Ordinal) {
        let (word, bit) = Self::split(ordinal);
        if let Some(w) = self.words.get_mut(word) {
            *w |= 1 << bit;
        }
    }

    /// Returns true if the bit for `ordinal` is set.
    #[must_use]
    pub fn contains(&self, ordinal: Ordinal) -> bool {
        let (word, bit) = Self::split(ordinal);
        self.words.get(word).is_some_and(|w| (w >> bit) & 1 == 1)
    }

    /// Returns the number of set bits below `ordinal`.
    #[must_use]
    pub fn rank(&self, ordinal: Ordinal) -> usize {
        let (word, bit) = Self::split(ordinal);
        let full: u32 = self.words.iter().take(word).map(|w| w.count_ones()).sum();
        let partial = match self.words.get(word) {
            Some(w) if bit > 0 => (w & ((1u32 << bit) - 1)).count_ones(),
            _ => 0,
        };
        (full + partial) as usize
    }

    /// Returns the dense position of `ordinal`, if its bit is set.
    #[must_use]
    pub fn position(&self, ordinal: Ordinal) -> Option<usize> {
        self.contains(ordinal).then(|| self.rank(ordinal))
    }

    /// Returns the number of set bits.
    #[must_use]
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns true if no bit is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Iterates over set ordinals in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Ordinal> + '_ {
        self.words.iter().enumerate().flat_map(|(w, &word)| {
            let mut bits = word;
            std::iter::from_fn(move || {
                if bits == 0 {
                    return None;
                }
                let b = bits.trailing_zeros() as usize;
                bits &= bits - 1;
                Ordinal::new(w * Self::WORD_BITS + b)
            })
        })
    }
}

/// One entity's attributes: presence mask plus densely packed values.
///
/// Invariant: `values.len() == mask.count()`, and the value for a set
/// ordinal lives at `mask.rank(ordinal)`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SparseEntity {
    mask: PresenceMask,
    values: Vec<AttributeValue>,
    /// Written during the currently open transaction.
    fresh: bool,
}

impl SparseEntity {
    /// Creates an entity with no attributes that is not fresh.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces all content from a slot vector indexed by ordinal.
    ///
    /// `None` slots (and slots past the mask width) become absent, even if
    /// they were present before. The entity is marked fresh afterwards.
    pub fn rebuild<I>(&mut self, slots: I)
    where
        I: IntoIterator<Item = Option<AttributeValue>>,
    {
        self.fresh = false;
        self.mask.clear();
        self.values.clear();

        for (index, slot) in slots.into_iter().enumerate() {
            let (Some(value), Some(ordinal)) = (slot, Ordinal::new(index)) else {
                continue;
            };
            self.values.push(value);
            self.mask.set(ordinal);
        }
        self.values.shrink_to_fit();

        self.fresh = true;
    }

    /// Returns the stored value for `ordinal`, if present.
    #[must_use]
    pub fn lookup(&self, ordinal: Ordinal) -> Option<&AttributeValue> {
        // A short dense array means corruption; treat it as absent.
        self.mask
            .position(ordinal)
            .and_then(|pos| self.values.get(pos))
    }

    /// Returns true if `ordinal` has a stored value.
    #[must_use]
    pub fn has(&self, ordinal: Ordinal) -> bool {
        self.mask.contains(ordinal)
    }

    /// Iterates over present ordinals in ascending order.
    pub fn ordinals(&self) -> impl Iterator<Item = Ordinal> + '_ {
        self.mask.iter()
    }

    /// Returns the presence mask.
    #[must_use]
    pub fn mask(&self) -> &PresenceMask {
        &self.mask
    }

    /// Returns the stored values in ascending ordinal order.
    #[must_use]
    pub fn values(&self) -> &[AttributeValue] {
        &self.values
    }

    /// Returns the number of present attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no attribute is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns true if the entity was written during the open transaction.
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        self.fresh
    }

    pub(crate) fn mark_stale(&mut self) {
        self.fresh = false;
    }
}
