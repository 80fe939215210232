#![allow(dead_code)]

//! Task fixtures.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::anyhow;
use logflow::dag::{FnTask, Output, Task};
use logflow::exec::Context;
use logflow::log::Value;

/// Source task always producing `value`.
pub fn constant(id: &str, value: impl Into<Value>) -> Arc<dyn Task> {
    let value = value.into();
    Arc::new(FnTask::new(id, move |_ctx: &Context| {
        Ok(Some(Output::new(value.clone())))
    }))
}

/// Sum of every integer input.
pub fn sum(id: &str) -> Arc<dyn Task> {
    Arc::new(FnTask::new(id, |ctx: &Context| {
        let total: i64 = ctx
            .arguments()
            .values()
            .map(|v| v.as_i64().ok_or_else(|| anyhow!("not an integer: {v}")))
            .sum::<anyhow::Result<i64>>()?;
        Ok(Some(Output::new(total)))
    }))
}

/// Product of every integer input.
pub fn multiply(id: &str) -> Arc<dyn Task> {
    Arc::new(FnTask::new(id, |ctx: &Context| {
        let product: i64 = ctx
            .arguments()
            .values()
            .map(|v| v.as_i64().ok_or_else(|| anyhow!("not an integer: {v}")))
            .product::<anyhow::Result<i64>>()?;
        Ok(Some(Output::new(product)))
    }))
}

/// Task that always declines.
pub fn declining(id: &str) -> Arc<dyn Task> {
    Arc::new(FnTask::new(id, |_ctx: &Context| Ok(None)))
}

/// Task whose body always fails.
pub fn failing(id: &str) -> Arc<dyn Task> {
    Arc::new(FnTask::new(id, |ctx: &Context| {
        Err(anyhow!("task '{}' exploded", ctx.task()))
    }))
}

/// Wraps a task and counts its invocations.
#[derive(Debug)]
pub struct CountingTask {
    inner: Arc<dyn Task>,
    calls: AtomicUsize,
}

impl CountingTask {
    pub fn wrap(inner: Arc<dyn Task>) -> Arc<Self> {
        Arc::new(Self {
            inner,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Task for CountingTask {
    fn id(&self) -> &str {
        self.inner.id()
    }

    fn run(&self, ctx: &Context) -> anyhow::Result<Option<Output>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.run(ctx)
    }
}
