// src/exec/incremental.rs

use std::sync::Arc;

use tracing::{debug, info};

use crate::dag::{Graph, Task};
use crate::errors::Result;
use crate::exec::{Environment, Executor, StepReport, invoke};
use crate::filter::LatestValuesForProducers;
use crate::log::Log;

/// Runs one frontier layer per call.
///
/// Repeated calls walk the graph layer by layer; once every reachable task
/// has a value the computed layer is empty and further calls are no-ops.
#[derive(Debug, Clone, Default)]
pub struct IncrementalExecutor {
    environment: Arc<Environment>,
}

impl IncrementalExecutor {
    pub fn new(environment: Arc<Environment>) -> Self {
        Self { environment }
    }
}

impl Executor for IncrementalExecutor {
    fn submit(&self, graph: &Graph, log: &dyn Log) -> Result<StepReport> {
        let layer = current_layer(graph, log)?;
        info!(
            graph = %graph.name(),
            layer = ?layer.iter().map(|t| t.id()).collect::<Vec<_>>(),
            "incremental step"
        );

        let mut report = StepReport::default();
        for task in layer {
            let invocation = invoke(graph, log, task.as_ref(), &self.environment)?;
            report.absorb(task.id(), invocation);
        }
        report.settle();
        Ok(report)
    }
}

/// The tasks the next incremental step would run.
///
/// When no task of the graph has an entry yet this is the set of source
/// tasks; otherwise it is [`Graph::next_tasks`] over the producers found in
/// the log.
pub fn current_layer(graph: &Graph, log: &dyn Log) -> Result<Vec<Arc<dyn Task>>> {
    let mut filter = LatestValuesForProducers::new(graph.tasks().map(|t| t.id().to_string()));
    let completed: Vec<String> = log
        .scan(&mut filter)?
        .into_iter()
        .map(|entry| entry.producer().to_string())
        .collect();

    if completed.is_empty() {
        debug!(graph = %graph.name(), "no entries yet; starting from sources");
        return Ok(graph.initial_tasks());
    }
    Ok(graph.next_tasks(&completed))
}
