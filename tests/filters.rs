// tests/filters.rs

use logflow::filter::{
    AllLatestValues, Filter, LatestValuesForProducers, PassAll, ProducerIdFilter, RefuseAll,
    from_fn,
};
use logflow::log::{Entry, ListLog, Log, Meta};
use logflow_test_utils::filters::CountingFilter;
use serde_json::json;

fn log_with(producers: &[(&str, i64)]) -> ListLog {
    let log = ListLog::new();
    for (producer, value) in producers {
        log.record(producer, json!(value), Meta::new()).unwrap();
    }
    log
}

#[test]
fn latest_values_for_producers_completes_before_older_entries() {
    // Newest first the scan visits a, a, b, c.
    let log = log_with(&[("c", 1), ("b", 2), ("a", 3), ("a", 4)]);

    let mut visited = Vec::new();
    let mut wanted = LatestValuesForProducers::new(["a", "b"]);
    let mut spy = from_fn(|entry: &Entry| {
        visited.push(entry.producer().to_string());
        true
    });

    let found = log.scan(&mut wanted).unwrap();
    let mut got: Vec<(String, i64)> = found
        .iter()
        .map(|e| (e.producer().to_string(), e.value().as_i64().unwrap()))
        .collect();
    got.sort();
    assert_eq!(got, vec![("a".to_string(), 4), ("b".to_string(), 2)]);
    assert!(wanted.complete());
    assert_eq!(wanted.missing().count(), 0);

    // A filter that never completes sees everything.
    log.scan(&mut spy).unwrap();
    assert_eq!(visited, vec!["a", "a", "b", "c"]);
}

#[test]
fn scan_stops_at_the_entry_that_completes_the_filter() {
    // Newest first: a, a, b, c. The set {a, b} is complete after two entries.
    let log = log_with(&[("c", 1), ("b", 2), ("a", 3), ("a", 4)]);

    let mut counting = CountingFilter::wrap(LatestValuesForProducers::new(["a", "b"]));
    let found = log.scan(&mut counting).unwrap();
    assert_eq!(found.len(), 2);
    assert!(counting.inner().complete());
    assert_eq!(counting.tested(), 3);
}

#[test]
fn scan_stops_as_soon_as_the_filter_completes() {
    // Newest first: a, b, a, c. Both producers are found after two entries.
    let log = log_with(&[("c", 1), ("a", 2), ("b", 3), ("a", 4)]);

    let mut counting = CountingFilter::wrap(LatestValuesForProducers::new(["a", "b"]));
    log.scan(&mut counting).unwrap();
    assert_eq!(counting.tested(), 2);

    // Reused for a second scan, the count starts over.
    log.scan(&mut counting).unwrap();
    assert_eq!(counting.tested(), 2);
}

#[test]
fn latest_values_for_producers_reports_missing() {
    let log = log_with(&[("a", 1)]);
    let mut filter = LatestValuesForProducers::new(["a", "z"]);

    let found = log.scan(&mut filter).unwrap();
    assert_eq!(found.len(), 1);
    assert!(!filter.complete());
    assert_eq!(filter.missing().collect::<Vec<_>>(), vec!["z"]);
}

#[test]
fn filter_is_reset_between_scans() {
    let log = log_with(&[("a", 1), ("b", 2)]);
    let mut filter = LatestValuesForProducers::new(["a", "b"]);

    assert_eq!(log.scan(&mut filter).unwrap().len(), 2);
    assert_eq!(log.scan(&mut filter).unwrap().len(), 2);

    let mut latest = AllLatestValues::new();
    assert_eq!(log.scan(&mut latest).unwrap().len(), 2);
    assert_eq!(log.scan(&mut latest).unwrap().len(), 2);
}

#[test]
fn empty_producer_set_matches_nothing() {
    let log = log_with(&[("a", 1)]);
    let mut filter = LatestValuesForProducers::new(Vec::<String>::new());
    assert!(filter.complete());
    assert!(log.scan(&mut filter).unwrap().is_empty());
}

#[test]
fn all_latest_values_keeps_newest_per_producer() {
    let log = log_with(&[("a", 1), ("b", 2), ("a", 3)]);
    let found = log.scan(&mut AllLatestValues::new()).unwrap();

    assert_eq!(found.len(), 2);
    assert_eq!(found[0].producer(), "a");
    assert_eq!(found[0].value(), &json!(3));
    assert_eq!(found[1].producer(), "b");
}

#[test]
fn producer_id_filter_keeps_full_history() {
    let log = log_with(&[("a", 1), ("b", 2), ("a", 3)]);
    let found = log.scan(&mut ProducerIdFilter::new(["a"])).unwrap();

    let values: Vec<i64> = found.iter().map(|e| e.value().as_i64().unwrap()).collect();
    assert_eq!(values, vec![3, 1]);
}

#[test]
fn pass_all_and_refuse_all() {
    let log = log_with(&[("a", 1), ("b", 2)]);
    assert_eq!(log.scan(&mut PassAll).unwrap().len(), 2);
    assert!(log.scan(&mut RefuseAll).unwrap().is_empty());
}

#[test]
fn closure_filter_sees_entries_newest_first() {
    let log = log_with(&[("a", 1), ("b", 2), ("c", 3)]);
    let found = log
        .scan(&mut from_fn(|e: &Entry| e.value().as_i64() != Some(2)))
        .unwrap();

    let producers: Vec<&str> = found.iter().map(|e| e.producer()).collect();
    assert_eq!(producers, vec!["c", "a"]);
}
