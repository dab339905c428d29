//! Integration tests for the string pool
//!
//! Tests content-addressed sharing and release of unused strings.

use std::sync::Arc;

use smallcache_foundation::{AttributeValue, PlainValue, StringPool};

#[test]
fn equal_content_shares_one_allocation() {
    let mut pool = StringPool::new();
    let handles: Vec<_> = (0..100).map(|_| pool.intern("category-a")).collect();

    assert_eq!(pool.len(), 1);
    assert!(handles.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
}

#[test]
fn values_hold_pool_handles() {
    let mut pool = StringPool::new();
    let a = AttributeValue::from_plain(PlainValue::from("x"), &mut pool);
    let b = AttributeValue::from_plain(PlainValue::from(vec!["x", "y"]), &mut pool);

    let (AttributeValue::String(s), AttributeValue::List(items)) = (&a, &b) else {
        panic!("unexpected value shapes");
    };
    assert!(Arc::ptr_eq(s, &items[0]));
    assert_eq!(pool.len(), 2);
}

#[test]
fn dropping_values_lets_pool_purge() {
    let mut pool = StringPool::new();
    let value = AttributeValue::from_plain(PlainValue::from("temp"), &mut pool);

    assert_eq!(pool.purge_unused(), 0);
    drop(value);
    assert_eq!(pool.purge_unused(), 1);
    assert!(!pool.contains("temp"));
}
