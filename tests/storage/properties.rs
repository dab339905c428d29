//! Property tests for the add/get round trip through the cache.

use proptest::collection::vec;
use proptest::option;
use proptest::prelude::*;

use smallcache_foundation::PlainValue;
use smallcache_storage::{Cache, MAX_ATTRIBUTES};

use crate::numbered;

fn plain_value() -> impl Strategy<Value = PlainValue> {
    prop_oneof![
        Just(PlainValue::Absent),
        any::<bool>().prop_map(PlainValue::Bool),
        (-1.0e9..1.0e9f64).prop_map(PlainValue::Number),
        "[a-z ]{0,8}".prop_map(PlainValue::String),
        vec("[a-z]{0,4}", 0..4).prop_map(PlainValue::List),
    ]
}

/// One optional value per attribute of a schema of random width.
fn sparse_record() -> impl Strategy<Value = Vec<Option<PlainValue>>> {
    (1..=MAX_ATTRIBUTES).prop_flat_map(|width| vec(option::weighted(0.3, plain_value()), width))
}

proptest! {
    #[test]
    fn add_then_get_one_round_trips(record in sparse_record()) {
        let names = numbered(record.len());
        let mut cache = Cache::new(&names).unwrap();

        cache.begin_transaction(1, true).unwrap();
        let attributes = names
            .iter()
            .zip(&record)
            .filter_map(|(name, value)| value.clone().map(|v| (name.clone(), v)));
        cache.add("item", attributes).unwrap();
        cache.end_transaction().unwrap();

        let res = cache.get_one("item", &names);
        prop_assert_eq!(res.len(), names.len());
        for (got, supplied) in res.iter().zip(&record) {
            let expected = supplied.clone().unwrap_or(PlainValue::Absent);
            prop_assert_eq!(got, &expected);
        }
    }

    #[test]
    fn rewrite_forgets_omitted_attributes(
        first in sparse_record(),
        keep in vec(any::<bool>(), MAX_ATTRIBUTES),
    ) {
        let names = numbered(first.len());
        let mut cache = Cache::new(&names).unwrap();

        cache.begin_transaction(0, true).unwrap();
        let full = names.iter().cloned().zip(first.iter().cloned().map(Option::unwrap_or_default));
        cache.add("item", full).unwrap();

        let kept: Vec<(String, PlainValue)> = names
            .iter()
            .zip(&first)
            .zip(&keep)
            .filter(|(_, k)| **k)
            .filter_map(|((name, value), _)| value.clone().map(|v| (name.clone(), v)))
            .collect();
        cache.add("item", kept.clone()).unwrap();
        cache.end_transaction().unwrap();

        let res = cache.get_one("item", &names);
        for (name, got) in names.iter().zip(&res) {
            let expected = kept
                .iter()
                .find(|(n, _)| n == name)
                .map_or(PlainValue::Absent, |(_, v)| v.clone());
            prop_assert_eq!(got, &expected);
        }
    }
}
