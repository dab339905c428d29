//! Generational refresh transactions.
//!
//! A transaction brackets one bulk refresh. Every entity written while it is
//! open is marked fresh; closing it sweeps the cache once, down-marking fresh
//! entities and either removing or keeping the rest.
//!
//! There is no isolation: writes are visible to queries immediately, so a
//! reader may observe a half-refreshed generation.

use std::collections::HashMap;
use std::fmt;

use smallcache_foundation::{Error, Result};

use crate::entity::SparseEntity;

/// Policy and bookkeeping of the open transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpenTransaction {
    /// Generation number of this transaction (1-based).
    pub generation: u64,
    /// Entity count when the transaction began.
    pub baseline_len: usize,
    /// Whether unrefreshed entities are removed at the end.
    pub remove_stale: bool,
}

/// Transaction state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransactionState {
    /// No transaction open; writes are rejected.
    #[default]
    Closed,
    /// A transaction is open.
    Open(OpenTransaction),
}

/// Outcome of closing a transaction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Generation that was closed.
    pub generation: u64,
    /// Entity count when the transaction began.
    pub baseline_len: usize,
    /// Entities written during the transaction.
    pub refreshed: usize,
    /// Unrefreshed entities kept because removal was not requested.
    pub kept_stale: usize,
    /// Unrefreshed entities removed.
    pub removed: usize,
    /// Pool strings released after the sweep.
    pub purged_strings: usize,
}

impl SweepReport {
    /// Returns the number of entities left in the cache.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.refreshed + self.kept_stale
    }
}

impl fmt::Display for SweepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "generation {}: {} refreshed, {} kept stale, {} removed, {} strings purged",
            self.generation, self.refreshed, self.kept_stale, self.removed, self.purged_strings
        )
    }
}

/// Tracks the open/closed state and the generation counter.
#[derive(Clone, Debug, Default)]
pub struct TransactionManager {
    state: TransactionState,
    generation: u64,
}

impl TransactionManager {
    /// Creates a manager with no transaction open.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// Returns true if a transaction is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self.state, TransactionState::Open(_))
    }

    /// Returns the number of transactions begun so far.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Opens a transaction.
    ///
    /// # Errors
    ///
    /// Returns a state error if a transaction is already open; the state is
    /// left unchanged.
    pub fn begin(&mut self, baseline_len: usize, remove_stale: bool) -> Result<OpenTransaction> {
        if self.is_open() {
            return Err(Error::transaction_already_open());
        }

        self.generation += 1;
        let open = OpenTransaction {
            generation: self.generation,
            baseline_len,
            remove_stale,
        };
        self.state = TransactionState::Open(open);
        Ok(open)
    }

    /// Returns the open transaction.
    ///
    /// # Errors
    ///
    /// Returns a state error if no transaction is open.
    pub fn require_open(&self) -> Result<&OpenTransaction> {
        match &self.state {
            TransactionState::Open(open) => Ok(open),
            TransactionState::Closed => Err(Error::transaction_not_open()),
        }
    }

    /// Closes the open transaction, sweeping `entities`.
    ///
    /// Fresh entities are kept and down-marked so they must be refreshed
    /// again to survive the next removing sweep. Unrefreshed entities are
    /// removed if the transaction asked for it, otherwise kept as they are.
    ///
    /// # Errors
    ///
    /// Returns a state error if no transaction is open; nothing is swept.
    pub fn end(&mut self, entities: &mut HashMap<String, SparseEntity>) -> Result<SweepReport> {
        let open = *self.require_open()?;

        let mut report = SweepReport {
            generation: open.generation,
            baseline_len: open.baseline_len,
            ..SweepReport::default()
        };

        entities.retain(|_, entity| {
            if entity.is_fresh() {
                entity.mark_stale();
                report.refreshed += 1;
                true
            } else if open.remove_stale {
                report.removed += 1;
                false
            } else {
                report.kept_stale += 1;
                true
            }
        });

        self.state = TransactionState::Closed;
        Ok(report)
    }
}
