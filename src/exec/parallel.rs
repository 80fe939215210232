// src/exec/parallel.rs

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::dag::Graph;
use crate::errors::{LogflowError, Result};
use crate::exec::{Environment, Invocation, StepReport, current_layer, invoke};
use crate::log::Log;
use crate::types::TaskId;

/// Incremental step whose tasks run concurrently on the blocking pool.
///
/// Tasks of one layer are independent of each other, so the only shared
/// state is the log, which serialises appends internally. If any task
/// fails, the remaining ones still run to completion and the first error is
/// returned.
#[derive(Debug, Clone, Default)]
pub struct ParallelExecutor {
    environment: Arc<Environment>,
}

impl ParallelExecutor {
    pub fn new(environment: Arc<Environment>) -> Self {
        Self { environment }
    }

    pub async fn submit(&self, graph: Arc<Graph>, log: Arc<dyn Log>) -> Result<StepReport> {
        let layer = current_layer(&graph, log.as_ref())?;
        info!(
            graph = %graph.name(),
            layer = ?layer.iter().map(|t| t.id()).collect::<Vec<_>>(),
            "parallel step"
        );

        let mut set: JoinSet<Result<(TaskId, Invocation)>> = JoinSet::new();
        for task in layer {
            let graph = Arc::clone(&graph);
            let log = Arc::clone(&log);
            let environment = Arc::clone(&self.environment);
            set.spawn_blocking(move || {
                let invocation = invoke(&graph, log.as_ref(), task.as_ref(), &environment)?;
                Ok((task.id().to_string(), invocation))
            });
        }

        let mut report = StepReport::default();
        let mut failure: Option<LogflowError> = None;
        while let Some(joined) = set.join_next().await {
            let outcome = match joined {
                Ok(outcome) => outcome,
                Err(join) => Err(LogflowError::Other(anyhow::anyhow!(
                    "task panicked or was cancelled: {join}"
                ))),
            };
            match outcome {
                Ok((id, invocation)) => report.absorb(&id, invocation),
                Err(err) => {
                    warn!(error = %err, "task in parallel layer failed");
                    failure.get_or_insert(err);
                }
            }
        }

        if let Some(err) = failure {
            return Err(err);
        }

        // Completion order is not deterministic.
        report.completed.sort();
        report.declined.sort();
        report.blocked.sort();
        report.settle();
        Ok(report)
    }
}
