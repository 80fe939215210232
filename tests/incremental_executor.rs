// tests/incremental_executor.rs

mod common;

use std::sync::Arc;

use common::{diamond_graph, ids, producers, tasks};
use logflow::dag::GraphBuilder;
use logflow::engine::final_results;
use logflow::errors::LogflowError;
use logflow::exec::{Environment, Executor, IncrementalExecutor, current_layer};
use logflow::log::{FileLog, ListLog, Log, Meta};
use serde_json::json;

fn executor() -> IncrementalExecutor {
    IncrementalExecutor::new(Arc::new(Environment::empty()))
}

#[test]
fn sum_of_two_constants_converges_in_three_steps() {
    common::init_tracing();
    let graph = GraphBuilder::directed("sum")
        .task(tasks::constant("a", 2))
        .task(tasks::constant("b", 3))
        .task(tasks::sum("sum"))
        .link("a", "sum")
        .link("b", "sum")
        .build()
        .unwrap();
    let log = ListLog::new();
    let exec = executor();

    let first = exec.submit(&graph, &log).unwrap();
    assert_eq!(first.completed, vec!["a", "b"]);
    let second = exec.submit(&graph, &log).unwrap();
    assert_eq!(second.completed, vec!["sum"]);
    let third = exec.submit(&graph, &log).unwrap();
    assert!(third.is_noop());

    let results = final_results(&graph, &log).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].value(), &json!(5));

    // Further calls append nothing.
    for _ in 0..3 {
        assert!(exec.submit(&graph, &log).unwrap().is_noop());
    }
    assert_eq!(log.len(), 3);
}

#[test]
fn chained_arithmetic() {
    let graph = GraphBuilder::directed("chain")
        .task(tasks::constant("five", 5))
        .task(tasks::constant("three", 3))
        .task(tasks::sum("sum"))
        .task(tasks::constant("two", 2))
        .task(tasks::multiply("product"))
        .link("five", "sum")
        .link("three", "sum")
        .link("sum", "product")
        .link("two", "product")
        .build()
        .unwrap();
    let log = ListLog::new();
    let exec = executor();

    let mut steps = 0;
    while !exec.submit(&graph, &log).unwrap().is_noop() {
        steps += 1;
        assert!(steps < 10, "did not converge");
    }

    let results = final_results(&graph, &log).unwrap();
    assert_eq!(common::value_of(&results, "product"), Some(json!(16)));
}

#[test]
fn diamond_runs_layer_by_layer() {
    let graph = diamond_graph();
    let log = ListLog::new();
    let exec = executor();

    assert_eq!(ids(&current_layer(&graph, &log).unwrap()), vec!["a", "b", "c"]);
    exec.submit(&graph, &log).unwrap();
    assert_eq!(ids(&current_layer(&graph, &log).unwrap()), vec!["d"]);
    exec.submit(&graph, &log).unwrap();
    assert_eq!(ids(&current_layer(&graph, &log).unwrap()), vec!["e", "f"]);
    exec.submit(&graph, &log).unwrap();
    assert!(current_layer(&graph, &log).unwrap().is_empty());

    let results = final_results(&graph, &log).unwrap();
    // d = 1 + 2, e = d + 3, f = d
    assert_eq!(common::value_of(&results, "e"), Some(json!(6)));
    assert_eq!(common::value_of(&results, "f"), Some(json!(3)));
    assert_eq!(producers(&log), vec!["a", "b", "c", "d", "e", "f"]);
}

#[test]
fn declined_task_stalls_its_downstream() {
    let graph = GraphBuilder::directed("stall")
        .task(tasks::constant("a", 1))
        .task(tasks::declining("gate"))
        .task(tasks::sum("after"))
        .link("a", "gate")
        .link("gate", "after")
        .build()
        .unwrap();
    let log = ListLog::new();
    let exec = executor();

    exec.submit(&graph, &log).unwrap();
    let report = exec.submit(&graph, &log).unwrap();
    assert_eq!(report.declined, vec!["gate"]);
    assert!(report.is_noop());

    // Re-running the layer keeps declining; `after` never runs.
    let again = exec.submit(&graph, &log).unwrap();
    assert_eq!(again.declined, vec!["gate"]);
    assert_eq!(producers(&log), vec!["a"]);
    assert!(final_results(&graph, &log).unwrap().is_empty());
}

#[test]
fn task_failure_aborts_the_step() {
    let graph = GraphBuilder::directed("boom")
        .task(tasks::constant("a", 1))
        .task(tasks::failing("bad"))
        .link("a", "bad")
        .build()
        .unwrap();
    let log = ListLog::new();
    let exec = executor();

    exec.submit(&graph, &log).unwrap();
    match exec.submit(&graph, &log) {
        Err(LogflowError::TaskFailed { task, source }) => {
            assert_eq!(task, "bad");
            assert!(source.to_string().contains("exploded"));
        }
        other => panic!("Expected TaskFailed, got: {:?}", other),
    }
    assert_eq!(log.len(), 1);
}

#[test]
fn entries_from_outside_the_graph_are_ignored() {
    let graph = GraphBuilder::directed("solo")
        .task(tasks::constant("a", 1))
        .build()
        .unwrap();
    let log = ListLog::new();
    log.record("stranger", json!(0), Meta::new()).unwrap();

    assert_eq!(ids(&current_layer(&graph, &log).unwrap()), vec!["a"]);
    assert_eq!(executor().submit(&graph, &log).unwrap().completed, vec!["a"]);
}

#[test]
fn resumes_from_a_reopened_file_log() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("resume.jsonl");
    let graph = diamond_graph();
    let exec = executor();

    {
        let log = FileLog::open(&path).unwrap();
        exec.submit(&graph, &log).unwrap();
        exec.submit(&graph, &log).unwrap();
        log.close().unwrap();
    }

    let log = FileLog::open(&path).unwrap();
    assert_eq!(ids(&current_layer(&graph, &log).unwrap()), vec!["e", "f"]);
    let report = exec.submit(&graph, &log).unwrap();
    assert_eq!(report.completed, vec!["e", "f"]);
    assert!(exec.submit(&graph, &log).unwrap().is_noop());
}
