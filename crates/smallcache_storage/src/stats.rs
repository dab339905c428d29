//! Read-only memory and usage introspection.

use std::collections::HashSet;
use std::fmt;
use std::mem::size_of;

use smallcache_foundation::{AttributeValue, InternedStr, StringPool, ValueKind};

use crate::config::CacheConfig;
use crate::entity::SparseEntity;

/// Reference-count header in front of every `Arc<str>` allocation.
const ARC_HEADER: usize = 2 * size_of::<usize>();

/// Count and byte estimate for one value kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KindStats {
    /// The value kind.
    pub kind: ValueKind,
    /// Stored values of this kind.
    pub count: usize,
    /// Bytes taken by their dense-array slots.
    pub slot_bytes: usize,
    /// Heap bytes owned by the values themselves.
    pub heap_bytes: usize,
}

/// Snapshot of cache memory usage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of entities.
    pub entities: usize,
    /// Entity records and their id strings.
    pub entity_bytes: usize,
    /// Per-kind breakdown, in [`ValueKind::ALL`] order.
    pub kinds: Vec<KindStats>,
    /// Total stored values.
    pub total_values: usize,
    /// Distinct string contents referenced by stored values.
    pub unique_strings: usize,
    /// Strings held by the pool.
    pub pool_strings: usize,
    /// Heap estimate of the pool.
    pub pool_heap_bytes: usize,
}

impl CacheStats {
    /// Walks every entity and value. Never mutates anything.
    pub fn collect<'a, I>(entities: I, pool: &StringPool, config: &CacheConfig) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a SparseEntity)>,
    {
        let slot_size = size_of::<AttributeValue>();
        let mut kinds: Vec<KindStats> = ValueKind::ALL
            .iter()
            .map(|&kind| KindStats {
                kind,
                count: 0,
                slot_bytes: 0,
                heap_bytes: 0,
            })
            .collect();

        let mut entity_count = 0;
        let mut entity_bytes = 0;
        let mut total_values = 0;
        let mut unique: HashSet<&str> = HashSet::new();

        for (id, entity) in entities {
            entity_count += 1;
            entity_bytes += size_of::<String>() + size_of::<SparseEntity>() + id.capacity();

            for value in entity.values() {
                total_values += 1;
                let heap = match value {
                    AttributeValue::String(s) => {
                        unique.insert(s.as_ref());
                        0
                    }
                    AttributeValue::List(items) => {
                        unique.extend(items.iter().map(AsRef::as_ref));
                        items.len() * size_of::<InternedStr>()
                    }
                    AttributeValue::Absent | AttributeValue::Bool(_) | AttributeValue::Number(_) => 0,
                };

                if let Some(entry) = kinds.iter_mut().find(|k| k.kind == value.kind()) {
                    entry.count += 1;
                    entry.slot_bytes += slot_size;
                    entry.heap_bytes += heap;
                }
            }
        }

        let pool_heap_bytes = pool
            .iter()
            .map(|s| {
                let buffer = if s.len() > config.inline_string_threshold {
                    ARC_HEADER + s.len()
                } else {
                    0
                };
                buffer + config.pool_entry_overhead
            })
            .sum();

        Self {
            entities: entity_count,
            entity_bytes,
            kinds,
            total_values,
            unique_strings: unique.len(),
            pool_strings: pool.len(),
            pool_heap_bytes,
        }
    }

    /// Returns the breakdown for one kind.
    #[must_use]
    pub fn kind(&self, kind: ValueKind) -> Option<&KindStats> {
        self.kinds.iter().find(|k| k.kind == kind)
    }

    /// Bytes taken by dense-array slots.
    #[must_use]
    pub fn total_slot_bytes(&self) -> usize {
        self.kinds.iter().map(|k| k.slot_bytes).sum()
    }

    /// Heap bytes outside the slots: lists, the pool, and entity records.
    #[must_use]
    pub fn total_heap_bytes(&self) -> usize {
        let lists: usize = self.kinds.iter().map(|k| k.heap_bytes).sum();
        lists + self.pool_heap_bytes + self.entity_bytes
    }

    /// Approximate total footprint.
    #[must_use]
    pub fn total_bytes(&self) -> usize {
        self.total_slot_bytes() + self.total_heap_bytes()
    }
}

/// Formats a byte count with a binary unit, e.g. `1.50 KiB`.
#[must_use]
pub fn human_readable_size(bytes: usize) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

    #[allow(clippy::cast_precision_loss)]
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.2} {}", UNITS[unit])
}

fn kind_label(kind: ValueKind) -> &'static str {
    match kind {
        ValueKind::Absent => "null",
        ValueKind::Number => "number",
        ValueKind::Bool => "bool",
        ValueKind::String => "string (handles)",
        ValueKind::List => "list of strings (heap)",
    }
}

fn write_row(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    count: &dyn fmt::Display,
    slot: usize,
    heap: usize,
) -> fmt::Result {
    writeln!(
        f,
        "{label:<34}{count:>12}{slot:>16}{heap:>16}{:>16}",
        human_readable_size(slot + heap)
    )
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<34}{:>12}{:>16}{:>16}{:>16}",
            "kind", "count", "slot bytes", "heap bytes", "human(total)"
        )?;
        writeln!(f, "{:-<94}", "")?;
        for k in &self.kinds {
            write_row(f, kind_label(k.kind), &k.count, k.slot_bytes, k.heap_bytes)?;
        }
        writeln!(f, "{:-<94}", "")?;
        write_row(f, "referenced unique strings", &self.unique_strings, 0, 0)?;
        write_row(
            f,
            "string pool entries",
            &self.pool_strings,
            0,
            self.pool_heap_bytes,
        )?;
        write_row(f, "entity records", &self.entities, 0, self.entity_bytes)?;
        writeln!(f, "{:=<94}", "")?;
        let slots = self.total_slot_bytes();
        let heap = self.total_heap_bytes();
        write_row(f, "value storage (slots)", &self.total_values, slots, 0)?;
        write_row(f, "heap only (lists + pool + records)", &"", 0, heap)?;
        write_row(f, "TOTAL (approx)", &"", slots, heap)
    }
}
