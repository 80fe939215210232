// src/services.rs

//! Built-in services available through [`Registry::with_builtins`].
//!
//! Numeric services keep integer results when every input is an integer
//! and fall back to floating point otherwise.
//!
//! [`Registry::with_builtins`]: crate::registry::Registry::with_builtins

use std::sync::Arc;

use anyhow::{Context as _, anyhow, bail};

use crate::dag::{FnTask, Output, Task};
use crate::errors::{LogflowError, Result};
use crate::exec::Context;
use crate::log::Value;

/// `constant`: a source emitting `args.value`.
pub fn constant(id: &str, args: &Value) -> Result<Arc<dyn Task>> {
    let value = args.get("value").cloned().ok_or_else(|| {
        LogflowError::Config(format!("task '{id}': constant needs `args.value`"))
    })?;
    Ok(Arc::new(FnTask::new(id, move |_ctx: &Context| {
        Ok(Some(Output::new(value.clone())))
    })))
}

/// `sum`: adds every input. Zero without inputs.
pub fn sum(id: &str, _args: &Value) -> Result<Arc<dyn Task>> {
    Ok(Arc::new(FnTask::new(id, |ctx: &Context| {
        let inputs: Vec<&Value> = ctx.arguments().values().collect();
        fold_numbers(&inputs, 0, i64::checked_add, |a, b| a + b).map(|v| Some(Output::new(v)))
    })))
}

/// `multiply`: multiplies every input. Zero without inputs.
pub fn multiply(id: &str, _args: &Value) -> Result<Arc<dyn Task>> {
    Ok(Arc::new(FnTask::new(id, |ctx: &Context| {
        let inputs: Vec<&Value> = ctx.arguments().values().collect();
        if inputs.is_empty() {
            return Ok(Some(Output::new(0)));
        }
        fold_numbers(&inputs, 1, i64::checked_mul, |a, b| a * b).map(|v| Some(Output::new(v)))
    })))
}

/// `sub`: `left - right`, where `args.left`/`args.right` name the
/// predecessors to use (default `"a"` and `"b"`).
pub fn sub(id: &str, args: &Value) -> Result<Arc<dyn Task>> {
    let left = operand_name(id, args, "left", "a")?;
    let right = operand_name(id, args, "right", "b")?;
    Ok(Arc::new(FnTask::new(id, move |ctx: &Context| {
        let l = ctx
            .lookup(&left)
            .with_context(|| format!("missing operand '{left}'"))?;
        let r = ctx
            .lookup(&right)
            .with_context(|| format!("missing operand '{right}'"))?;
        let negated = negate(r)?;
        fold_numbers(&[l, &negated], 0, i64::checked_add, |a, b| a + b)
            .map(|v| Some(Output::new(v)))
    })))
}

/// `null`: always declines.
pub fn null(id: &str, _args: &Value) -> Result<Arc<dyn Task>> {
    Ok(Arc::new(FnTask::new(id, |_ctx: &Context| Ok(None))))
}

/// `env`: emits the value named `args.name`, looked up in the arguments and
/// then the environment. Declines when the name is unknown.
pub fn env(id: &str, args: &Value) -> Result<Arc<dyn Task>> {
    let name = args
        .get("name")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| LogflowError::Config(format!("task '{id}': env needs `args.name`")))?;
    Ok(Arc::new(FnTask::new(id, move |ctx: &Context| {
        Ok(ctx.lookup(&name).cloned().map(Output::new))
    })))
}

fn operand_name(id: &str, args: &Value, key: &str, default: &str) -> Result<String> {
    match args.get(key) {
        None => Ok(default.to_string()),
        Some(Value::String(name)) => Ok(name.clone()),
        Some(other) => Err(LogflowError::Config(format!(
            "task '{id}': `args.{key}` must be a task id, got {other}"
        ))),
    }
}

fn negate(value: &Value) -> anyhow::Result<Value> {
    if let Some(i) = value.as_i64().and_then(i64::checked_neg) {
        return Ok(Value::from(i));
    }
    match value.as_f64() {
        Some(f) => Ok(Value::from(-f)),
        None => bail!("not a number: {value}"),
    }
}

/// Combine numbers, staying in `i64` while possible.
fn fold_numbers(
    inputs: &[&Value],
    identity: i64,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> anyhow::Result<Value> {
    let mut ints = Some(identity);
    let mut float = identity as f64;
    for value in inputs {
        let f = value
            .as_f64()
            .ok_or_else(|| anyhow!("not a number: {value}"))?;
        float = float_op(float, f);
        ints = match (ints, value.as_i64()) {
            (Some(acc), Some(i)) => int_op(acc, i),
            _ => None,
        };
    }
    Ok(match ints {
        Some(i) => Value::from(i),
        None => Value::from(float),
    })
}
