#![allow(dead_code)]

use std::sync::Arc;

use logflow::dag::{Graph, GraphBuilder, Task};
use logflow::log::{Entry, Log};

pub use logflow_test_utils::builders;
pub use logflow_test_utils::init_tracing;
pub use logflow_test_utils::tasks;

/// `a -> d`, `b -> d`, `d -> e`, `c -> e`, `d -> f`, every task a constant
/// or a sum.
pub fn diamond_graph() -> Graph {
    GraphBuilder::directed("diamond")
        .task(tasks::constant("a", 1))
        .task(tasks::constant("b", 2))
        .task(tasks::constant("c", 3))
        .task(tasks::sum("d"))
        .task(tasks::sum("e"))
        .task(tasks::sum("f"))
        .link("a", "d")
        .link("b", "d")
        .link("d", "e")
        .link("c", "e")
        .link("d", "f")
        .build()
        .expect("diamond graph is valid")
}

/// Sorted ids of a task list.
pub fn ids(tasks: &[Arc<dyn Task>]) -> Vec<String> {
    let mut ids: Vec<String> = tasks.iter().map(|t| t.id().to_string()).collect();
    ids.sort();
    ids
}

/// Producers of every entry in the log, oldest first.
pub fn producers(log: &dyn Log) -> Vec<String> {
    let mut all = log
        .scan(&mut logflow::filter::PassAll)
        .expect("scan succeeds");
    all.reverse();
    all.iter().map(|e| e.producer().to_string()).collect()
}

pub fn value_of(entries: &[Entry], producer: &str) -> Option<serde_json::Value> {
    entries
        .iter()
        .find(|e| e.producer() == producer)
        .map(|e| e.value().clone())
}
