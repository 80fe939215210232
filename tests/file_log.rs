// tests/file_log.rs

use std::fs::{self, OpenOptions};
use std::io::Write;

use logflow::errors::LogflowError;
use logflow::filter::{LatestValuesForProducers, PassAll, ProducerIdFilter};
use logflow::log::{Entry, FileLog, Log, Meta};
use logflow_test_utils::filters::CountingFilter;
use serde_json::json;
use tempfile::tempdir;

#[test]
fn entries_survive_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.jsonl");

    {
        let log = FileLog::open(&path).unwrap();
        log.record("a", json!(1), Meta::new()).unwrap();
        log.record("b", json!({"nested": [1, 2]}), Meta::new()).unwrap();
        log.close().unwrap();
    }

    let reopened = FileLog::open(&path).unwrap();
    assert_eq!(reopened.len(), 2);
    let entries = reopened.scan(&mut PassAll).unwrap();
    assert_eq!(entries[0].producer(), "b");
    assert_eq!(entries[0].value(), &json!({"nested": [1, 2]}));
    assert_eq!(entries[1].value(), &json!(1));

    // New indexes continue after the recovered ones.
    let next = reopened.record("c", json!(3), Meta::new()).unwrap();
    assert!(next.index() > entries[0].index());
}

#[test]
fn incomplete_trailing_line_is_dropped_on_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("torn.jsonl");

    {
        let log = FileLog::open(&path).unwrap();
        log.record("a", json!(1), Meta::new()).unwrap();
        log.close().unwrap();
    }
    {
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        write!(file, "{{\"producer\":\"b\",\"ind").unwrap();
    }

    let log = FileLog::open(&path).unwrap();
    assert_eq!(log.len(), 1);
    log.record("b", json!(2), Meta::new()).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().count(), 2);
    for line in contents.lines() {
        serde_json::from_str::<Entry>(line).unwrap();
    }
}

#[test]
fn scan_stops_once_filter_completes() {
    let dir = tempdir().unwrap();
    let log = FileLog::open(dir.path().join("scan.jsonl")).unwrap();
    for (p, v) in [("c", 1), ("b", 2), ("a", 3), ("a", 4)] {
        log.record(p, json!(v), Meta::new()).unwrap();
    }

    // Newest first: a, a, b, c. Complete once b is seen, c is never read.
    let mut filter = CountingFilter::wrap(LatestValuesForProducers::new(["a", "b"]));
    let found = log.scan(&mut filter).unwrap();
    let values: Vec<i64> = found.iter().map(|e| e.value().as_i64().unwrap()).collect();
    assert_eq!(values, vec![4, 2]);
    assert_eq!(filter.tested(), 3);

    // Newest first: a, b, ... Complete after two entries.
    log.record("b", json!(5), Meta::new()).unwrap();
    log.record("a", json!(6), Meta::new()).unwrap();
    let found = log.scan(&mut filter).unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(filter.tested(), 2);
}

#[test]
fn closed_log_rejects_access() {
    let dir = tempdir().unwrap();
    let log = FileLog::open(dir.path().join("closed.jsonl")).unwrap();
    log.record("a", json!(1), Meta::new()).unwrap();
    log.close().unwrap();

    assert!(matches!(
        log.record("b", json!(2), Meta::new()),
        Err(LogflowError::Closed(id)) if id == log.id()
    ));
    assert!(matches!(log.scan(&mut PassAll), Err(LogflowError::Closed(_))));
    // Closing twice is fine.
    log.close().unwrap();
}

#[test]
fn fork_writes_a_sibling_file() {
    let dir = tempdir().unwrap();
    let log = FileLog::create_in(dir.path(), "flow").unwrap();
    log.record("a", json!(1), Meta::new()).unwrap();
    log.record("b", json!(2), Meta::new()).unwrap();
    log.record("a", json!(3), Meta::new()).unwrap();

    let fork = log.fork(&mut ProducerIdFilter::new(["a"])).unwrap();
    assert_eq!(fork.parent(), Some(log.id()));
    assert_eq!(fork.path().parent(), log.path().parent());
    assert_ne!(fork.path(), log.path());
    assert_eq!(fork.len(), 2);

    fork.record("z", json!(0), Meta::new()).unwrap();
    assert_eq!(log.len(), 3);

    // The fork is a regular log file and reopens with its own id.
    let fork_id = fork.id();
    let fork_path = fork.path().to_path_buf();
    fork.close().unwrap();
    let reopened = FileLog::open(&fork_path).unwrap();
    assert_eq!(reopened.id(), fork_id);
    assert_eq!(reopened.parent(), Some(log.id()));
    assert_eq!(reopened.len(), 3);

    // A log that was never forked has no lineage on reopen.
    let log_path = log.path().to_path_buf();
    log.close().unwrap();
    assert_eq!(FileLog::open(&log_path).unwrap().parent(), None);
}

#[test]
fn out_of_order_append_is_rejected() {
    let dir = tempdir().unwrap();
    let log = FileLog::open(dir.path().join("order.jsonl")).unwrap();
    log.append(Entry::new("a", 7, json!(1))).unwrap();

    assert!(matches!(
        log.append(Entry::new("b", 7, json!(2))),
        Err(LogflowError::IndexOrder { index: 7, last: 7 })
    ));
    assert_eq!(log.len(), 1);
}
