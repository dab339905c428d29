//! Integration tests for attribute schemas
//!
//! Tests construction limits and duplicate-name resolution.

use smallcache_foundation::PlainValue;
use smallcache_storage::{AttributeSchema, Cache, MAX_ATTRIBUTES};

use crate::{numbered, refresh};

#[test]
fn every_size_up_to_max_is_accepted() {
    for size in 1..=MAX_ATTRIBUTES {
        let schema = AttributeSchema::new(numbered(size)).unwrap();
        assert_eq!(schema.len(), size);
    }
}

#[test]
fn empty_and_oversized_are_rejected() {
    assert!(Cache::new(Vec::<String>::new()).unwrap_err().is_schema());
    assert!(Cache::new(numbered(MAX_ATTRIBUTES + 1)).unwrap_err().is_schema());
    assert!(Cache::new(numbered(200)).unwrap_err().is_schema());
}

#[test]
fn unknown_name_is_not_found() {
    let schema = AttributeSchema::new(["code"]).unwrap();
    assert!(schema.ordinal("label").is_none());
}

#[test]
fn duplicate_names_share_one_ordinal() {
    let names = ["A", "A"];
    let mut cache = Cache::new(names).unwrap();
    refresh(&mut cache, |c| {
        c.add("1", [("A", PlainValue::Number(1.0))]).unwrap();
    });

    let res = cache.get_one("1", &names);
    assert_eq!(res, vec![PlainValue::Number(1.0), PlainValue::Number(1.0)]);
}
