//! Integration tests for refresh transactions
//!
//! Tests stale sweeping, state errors, and generation bookkeeping.

use smallcache_foundation::PlainValue;
use smallcache_storage::Cache;

use crate::{num, refresh};

fn sorted_ids(cache: &Cache) -> Vec<String> {
    let mut ids = cache.get_all_ids();
    ids.sort();
    ids
}

// =============================================================================
// Sweep policy
// =============================================================================

#[test]
fn remove_stale_drops_unrefreshed() {
    let mut cache = Cache::new(["v"]).unwrap();
    refresh(&mut cache, |c| {
        for id in ["A", "B", "C"] {
            c.add(id, num("v", 1.0)).unwrap();
        }
    });

    cache.begin_transaction(2, true).unwrap();
    cache.add("A", num("v", 2.0)).unwrap();
    cache.add("C", num("v", 3.0)).unwrap();
    let report = cache.end_transaction().unwrap();

    assert_eq!(sorted_ids(&cache), vec!["A", "C"]);
    assert!(cache.get_one("B", &["v"]).is_empty());
    assert_eq!(report.refreshed, 2);
    assert_eq!(report.removed, 1);
    assert_eq!(report.baseline_len, 3);
}

#[test]
fn keep_stale_retains_unrefreshed() {
    let mut cache = Cache::new(["v"]).unwrap();
    refresh(&mut cache, |c| {
        for id in ["A", "B", "C"] {
            c.add(id, num("v", 1.0)).unwrap();
        }
    });

    cache.begin_transaction(0, false).unwrap();
    cache.add("A", num("v", 2.0)).unwrap();
    let report = cache.end_transaction().unwrap();

    assert_eq!(sorted_ids(&cache), vec!["A", "B", "C"]);
    assert_eq!(cache.get_one("B", &["v"]), vec![PlainValue::Number(1.0)]);
    assert_eq!(cache.get_one("A", &["v"]), vec![PlainValue::Number(2.0)]);
    assert_eq!(report.kept_stale, 2);
    assert_eq!(report.remaining(), 3);
}

#[test]
fn kept_items_removed_by_later_removing_sweep() {
    let mut cache = Cache::new(["v"]).unwrap();
    refresh(&mut cache, |c| {
        c.add("A", num("v", 1.0)).unwrap();
        c.add("B", num("v", 1.0)).unwrap();
    });

    cache.begin_transaction(0, false).unwrap();
    cache.add("C", num("v", 1.0)).unwrap();
    cache.end_transaction().unwrap();
    assert_eq!(cache.len(), 3);

    // Only C is written; A and B have been stale for two generations.
    cache.begin_transaction(0, true).unwrap();
    cache.add("C", num("v", 4.0)).unwrap();
    cache.end_transaction().unwrap();

    assert_eq!(sorted_ids(&cache), vec!["C"]);
}

#[test]
fn empty_removing_transaction_clears_cache() {
    let mut cache = Cache::new(["v"]).unwrap();
    refresh(&mut cache, |c| {
        c.add("A", num("v", 1.0)).unwrap();
    });

    refresh(&mut cache, |_| {});
    assert!(cache.is_empty());
    assert_eq!(cache.pool_len(), 0);
}

#[test]
fn every_entity_is_stale_after_end() {
    let mut cache = Cache::new(["v"]).unwrap();
    refresh(&mut cache, |c| {
        c.add("A", num("v", 1.0)).unwrap();
        c.add("B", num("v", 1.0)).unwrap();
    });

    for id in cache.get_all_ids() {
        assert!(!cache.entity(&id).unwrap().is_fresh());
    }
}

// =============================================================================
// State errors
// =============================================================================

#[test]
fn add_outside_transaction_changes_nothing() {
    let mut cache = Cache::new(["v"]).unwrap();
    refresh(&mut cache, |c| {
        c.add("A", num("v", 1.0)).unwrap();
    });

    let err = cache.add("A", num("v", 9.0)).unwrap_err();
    assert!(err.is_state());
    assert_eq!(cache.get_one("A", &["v"]), vec![PlainValue::Number(1.0)]);
    assert!(!cache.contains("B"));
}

#[test]
fn load_page_outside_transaction_changes_nothing() {
    let mut cache = Cache::new(["v"]).unwrap();
    let err = cache
        .load_page(r#"{"result": {"data": [{"id": "A", "attributes": []}]}}"#)
        .unwrap_err();

    assert!(err.is_state());
    assert!(cache.is_empty());
}

#[test]
fn nested_begin_is_rejected() {
    let mut cache = Cache::new(["v"]).unwrap();
    cache.begin_transaction(0, true).unwrap();

    let err = cache.begin_transaction(0, false).unwrap_err();
    assert!(err.is_state());
    assert!(err.to_string().contains("transaction already open"));
    assert!(cache.in_transaction());
}

#[test]
fn end_without_begin_is_rejected() {
    let mut cache = Cache::new(["v"]).unwrap();
    let err = cache.end_transaction().unwrap_err();

    assert!(err.is_state());
    assert!(err.to_string().contains("transaction not opened"));
    assert_eq!(cache.generation(), 0);
}

#[test]
fn generation_counts_transactions() {
    let mut cache = Cache::new(["v"]).unwrap();
    for expected in 1..=4 {
        cache.begin_transaction(0, expected % 2 == 0).unwrap();
        let report = cache.end_transaction().unwrap();
        assert_eq!(report.generation, expected);
    }
    assert_eq!(cache.generation(), 4);
}
