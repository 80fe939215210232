// src/exec/push.rs

//! Depth-first push execution.
//!
//! A submission starts at the source tasks and, each time a task records a
//! value, moves on to its successors. A task with missing inputs is left for
//! a later path (or a later submission) to reach again.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};

use crate::dag::{Graph, Task};
use crate::errors::Result;
use crate::exec::{Environment, Executor, Invocation, StepReport, invoke};
use crate::filter::LatestValuesForProducers;
use crate::log::Log;

#[derive(Debug, Clone, Default)]
pub struct PushExecutor {
    environment: Arc<Environment>,
}

impl PushExecutor {
    pub fn new(environment: Arc<Environment>) -> Self {
        Self { environment }
    }

    /// Continue a run from what the log already holds.
    ///
    /// Starts from [`ready_to_run_on`] instead of the source tasks, so tasks
    /// that already completed are not run again.
    pub fn resubmit(&self, graph: &Graph, log: &dyn Log) -> Result<StepReport> {
        let roots = ready_to_run_on(graph, log)?;
        info!(
            graph = %graph.name(),
            roots = ?roots.iter().map(|t| t.id()).collect::<Vec<_>>(),
            "push resubmit"
        );
        self.push_from(graph, log, roots)
    }

    fn push_from(
        &self,
        graph: &Graph,
        log: &dyn Log,
        roots: Vec<Arc<dyn Task>>,
    ) -> Result<StepReport> {
        let mut report = StepReport::default();
        // Reversed so that popping visits roots, then successors, in order.
        let mut stack: Vec<Arc<dyn Task>> = roots.into_iter().rev().collect();

        while let Some(task) = stack.pop() {
            let invocation = invoke(graph, log, task.as_ref(), &self.environment)?;
            if matches!(invocation, Invocation::Completed(_)) {
                stack.extend(graph.successors(task.id()).into_iter().rev());
            }
            report.absorb(task.id(), invocation);
        }

        report.settle();
        debug!(graph = %graph.name(), ?report, "push finished");
        Ok(report)
    }
}

impl Executor for PushExecutor {
    fn submit(&self, graph: &Graph, log: &dyn Log) -> Result<StepReport> {
        info!(graph = %graph.name(), "push submit");
        self.push_from(graph, log, graph.initial_tasks())
    }
}

/// Tasks to restart a push run from.
///
/// These are the tasks with no entry in the log, minus those that are a
/// successor of another task with no entry: reaching them again is left to
/// their pending predecessor.
pub fn ready_to_run_on(graph: &Graph, log: &dyn Log) -> Result<Vec<Arc<dyn Task>>> {
    let ids: Vec<String> = graph.tasks().map(|t| t.id().to_string()).collect();
    let mut filter = LatestValuesForProducers::new(ids.iter().cloned());
    let done: HashSet<String> = log
        .scan(&mut filter)?
        .into_iter()
        .map(|entry| entry.producer().to_string())
        .collect();

    let pending: Vec<Arc<dyn Task>> = graph
        .tasks()
        .filter(|t| !done.contains(t.id()))
        .cloned()
        .collect();

    let downstream: HashSet<String> = pending
        .iter()
        .flat_map(|t| graph.successors(t.id()))
        .map(|t| t.id().to_string())
        .collect();

    Ok(pending
        .into_iter()
        .filter(|t| !downstream.contains(t.id()))
        .collect())
}
