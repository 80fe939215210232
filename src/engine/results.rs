// src/engine/results.rs

use crate::dag::Graph;
use crate::errors::Result;
use crate::filter::LatestValuesForProducers;
use crate::log::{Entry, Log};

/// Newest entry of every final task, in graph order.
///
/// Final tasks that never completed are absent.
pub fn final_results(graph: &Graph, log: &dyn Log) -> Result<Vec<Entry>> {
    let finals = graph.final_tasks();
    let mut filter = LatestValuesForProducers::new(finals.iter().map(|t| t.id().to_string()));
    let mut found = log.scan(&mut filter)?;

    let mut ordered = Vec::with_capacity(found.len());
    for task in &finals {
        if let Some(pos) = found.iter().position(|e| e.producer() == task.id()) {
            ordered.push(found.swap_remove(pos));
        }
    }
    Ok(ordered)
}
