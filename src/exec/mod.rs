// src/exec/mod.rs

//! Task execution strategies.
//!
//! Every strategy runs tasks against a [`Graph`] and a [`Log`]; the log is
//! the only state, so an interrupted run can pick up from whatever the log
//! holds.
//!
//! - [`push`]: depth-first, drives a submission as far as inputs allow.
//! - [`incremental`]: one frontier layer per call.
//! - [`parallel`]: the incremental layer, with its tasks run concurrently.

pub mod context;
pub mod incremental;
pub mod parallel;
pub mod push;
pub mod report;

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::dag::{Graph, Task};
use crate::errors::{LogflowError, Result};
use crate::filter::LatestValuesForProducers;
use crate::log::{Entry, Log, Meta, Value};
use crate::types::TaskId;

pub use context::{Context, Environment};
pub use incremental::{IncrementalExecutor, current_layer};
pub use parallel::ParallelExecutor;
pub use push::{PushExecutor, ready_to_run_on};
pub use report::StepReport;

/// Synchronous executor over a borrowed graph and log.
pub trait Executor {
    fn submit(&self, graph: &Graph, log: &dyn Log) -> Result<StepReport>;
}

/// Outcome of a single task invocation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Invocation {
    Completed(Entry),
    Declined,
    /// Predecessors with no entry in the log yet.
    Blocked(Vec<TaskId>),
}

/// Meta key under which a recorded entry lists the entries it was computed
/// from, as `{producer: index}`. A task setting the key itself wins.
pub const INPUTS_META_KEY: &str = "inputs";

/// Gather inputs for `task`, run it, and record its output.
pub(crate) fn invoke(
    graph: &Graph,
    log: &dyn Log,
    task: &dyn Task,
    environment: &Arc<Environment>,
) -> Result<Invocation> {
    let inputs = graph.predecessor_ids(task.id());
    let mut filter = LatestValuesForProducers::new(inputs.iter().cloned());
    let entries = log.scan(&mut filter)?;

    if entries.len() != inputs.len() {
        let mut missing: Vec<TaskId> = filter.missing().map(str::to_string).collect();
        missing.sort();
        debug!(task = %task.id(), ?missing, "inputs not available");
        return Ok(Invocation::Blocked(missing));
    }

    let consumed: Meta = entries
        .iter()
        .map(|entry| (entry.producer().to_string(), Value::from(entry.index())))
        .collect();
    let arguments: BTreeMap<TaskId, _> = entries
        .into_iter()
        .map(|entry| (entry.producer().to_string(), entry.into_value()))
        .collect();
    let ctx = Context::new(task.id(), arguments, Arc::clone(environment));

    let output = task.run(&ctx).map_err(|source| LogflowError::TaskFailed {
        task: task.id().to_string(),
        source,
    })?;

    match output {
        Some(output) => {
            let mut meta = output.meta;
            if !consumed.is_empty() {
                meta.entry(INPUTS_META_KEY.to_string())
                    .or_insert_with(|| Value::from(serde_json::Map::from_iter(consumed)));
            }
            let entry = log.record(task.id(), output.value, meta)?;
            debug!(task = %task.id(), index = entry.index(), "recorded");
            Ok(Invocation::Completed(entry))
        }
        None => {
            debug!(task = %task.id(), "declined");
            Ok(Invocation::Declined)
        }
    }
}

impl StepReport {
    pub(crate) fn absorb(&mut self, task: &str, invocation: Invocation) {
        match invocation {
            Invocation::Completed(_) => self.completed.push(task.to_string()),
            Invocation::Declined => self.declined.push(task.to_string()),
            Invocation::Blocked(_) => self.blocked.push(task.to_string()),
        }
    }
}
