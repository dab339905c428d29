//! Integration tests for cache statistics

use smallcache_foundation::{PlainValue, ValueKind};
use smallcache_storage::{Cache, human_readable_size};

use crate::refresh;

#[test]
fn stats_count_values_by_kind() {
    let mut cache = Cache::new(["s", "n", "l"]).unwrap();
    refresh(&mut cache, |c| {
        c.add("a", [("s", PlainValue::from("red")), ("n", PlainValue::Number(1.0))])
            .unwrap();
        c.add(
            "b",
            [("s", PlainValue::from("red")), ("l", PlainValue::from(vec!["red", "blue"]))],
        )
        .unwrap();
    });

    let stats = cache.stats();
    assert_eq!(stats.entities, 2);
    assert_eq!(stats.total_values, 4);
    assert_eq!(stats.kind(ValueKind::String).map(|k| k.count), Some(2));
    assert_eq!(stats.kind(ValueKind::List).map(|k| k.count), Some(1));
    assert_eq!(stats.unique_strings, 2);
    assert_eq!(stats.pool_strings, 2);
}

#[test]
fn print_stats_renders_table() {
    let mut cache = Cache::new(["s"]).unwrap();
    refresh(&mut cache, |c| {
        c.add("a", [("s", PlainValue::from("v"))]).unwrap();
    });

    let text = cache.print_stats();
    assert!(text.contains("string (handles)"));
    assert!(text.contains("entity records"));
    assert!(text.contains(&human_readable_size(cache.stats().total_bytes())));
}
