// src/dag/task.rs

//! Units of computation placed in a [`Graph`](crate::dag::Graph).

use std::fmt;

use crate::exec::Context;
use crate::log::{Meta, Value};
use crate::types::TaskId;

/// Value produced by a task invocation, plus optional entry metadata.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Output {
    pub value: Value,
    pub meta: Meta,
}

impl Output {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            meta: Meta::new(),
        }
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }
}

impl From<Value> for Output {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

/// A named computation.
///
/// `run` receives the newest value of every direct predecessor through the
/// [`Context`] and returns:
/// - `Ok(Some(output))` to have the output recorded in the log,
/// - `Ok(None)` to decline; nothing is recorded and nothing downstream of
///   this task runs,
/// - `Err(_)` when the computation itself failed; the executor call aborts.
pub trait Task: Send + Sync + fmt::Debug {
    fn id(&self) -> &str;

    fn run(&self, ctx: &Context) -> anyhow::Result<Option<Output>>;
}

/// Task backed by a closure.
pub struct FnTask<F> {
    id: TaskId,
    body: F,
}

impl<F> FnTask<F>
where
    F: Fn(&Context) -> anyhow::Result<Option<Output>> + Send + Sync,
{
    pub fn new(id: impl Into<TaskId>, body: F) -> Self {
        Self {
            id: id.into(),
            body,
        }
    }
}

impl<F> fmt::Debug for FnTask<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTask").field("id", &self.id).finish_non_exhaustive()
    }
}

impl<F> Task for FnTask<F>
where
    F: Fn(&Context) -> anyhow::Result<Option<Output>> + Send + Sync,
{
    fn id(&self) -> &str {
        &self.id
    }

    fn run(&self, ctx: &Context) -> anyhow::Result<Option<Output>> {
        (self.body)(ctx)
    }
}
