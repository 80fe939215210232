// src/engine/runner.rs

use std::sync::Arc;

use tracing::{debug, info};

use crate::dag::Graph;
use crate::errors::Result;
use crate::exec::{
    Environment, Executor, IncrementalExecutor, ParallelExecutor, PushExecutor, StepReport,
};
use crate::log::Log;

use super::Strategy;

/// Outcome of [`Runner::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Executor calls made.
    pub steps: usize,
    /// All steps folded together.
    pub report: StepReport,
    /// True when the last step appended nothing, i.e. another step would not
    /// change the log either.
    pub settled: bool,
}

/// Repeats executor steps until one appends nothing or the step limit is
/// reached.
///
/// With the push strategy every step after the first is a resubmission;
/// each one that appends something shrinks the set of tasks with no entry,
/// so the loop always ends.
#[derive(Debug, Clone)]
pub struct Runner {
    strategy: Strategy,
    environment: Arc<Environment>,
    max_steps: Option<usize>,
    resume: bool,
}

impl Runner {
    pub fn new(strategy: Strategy, environment: Arc<Environment>) -> Self {
        Self {
            strategy,
            environment,
            max_steps: None,
            resume: false,
        }
    }

    /// Stop after `steps` executor calls even if the run has not settled.
    pub fn with_max_steps(mut self, steps: usize) -> Self {
        self.max_steps = Some(steps);
        self
    }

    /// Continue from the log contents instead of starting at the sources.
    ///
    /// Only changes the push strategy; the layered strategies always derive
    /// their position from the log.
    pub fn resuming(mut self, resume: bool) -> Self {
        self.resume = resume;
        self
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub async fn run(&self, graph: Arc<Graph>, log: Arc<dyn Log>) -> Result<RunSummary> {
        info!(
            graph = %graph.name(),
            strategy = %self.strategy,
            entries = log.len(),
            "run started"
        );

        let mut summary = RunSummary::default();
        loop {
            if self.max_steps.is_some_and(|max| summary.steps >= max) {
                info!(steps = summary.steps, "step limit reached");
                break;
            }

            let step = self.step(&graph, &log, summary.steps).await?;
            summary.steps += 1;
            debug!(step = summary.steps, ?step, "step finished");

            let noop = step.is_noop();
            summary.report.merge(step);
            if noop {
                summary.settled = true;
                break;
            }
        }

        info!(
            steps = summary.steps,
            completed = summary.report.completed.len(),
            settled = summary.settled,
            "run finished"
        );
        Ok(summary)
    }

    async fn step(&self, graph: &Arc<Graph>, log: &Arc<dyn Log>, taken: usize) -> Result<StepReport> {
        let env = Arc::clone(&self.environment);
        match self.strategy {
            Strategy::Incremental => IncrementalExecutor::new(env).submit(graph, log.as_ref()),
            Strategy::Push => {
                let push = PushExecutor::new(env);
                if self.resume || taken > 0 {
                    push.resubmit(graph, log.as_ref())
                } else {
                    push.submit(graph, log.as_ref())
                }
            }
            Strategy::Parallel => {
                ParallelExecutor::new(env)
                    .submit(Arc::clone(graph), Arc::clone(log))
                    .await
            }
        }
    }
}
