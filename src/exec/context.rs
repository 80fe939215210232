// src/exec/context.rs

//! Read-only inputs handed to a task invocation.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::log::Value;
use crate::types::TaskId;

/// Snapshot of environment settings shared by every invocation.
///
/// Captured once (usually at startup) and never refreshed, so that every
/// task in a run sees the same values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    vars: BTreeMap<String, Value>,
}

impl Environment {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Snapshot of the process environment.
    pub fn capture() -> Self {
        Self::from_pairs(std::env::vars())
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Layer `overrides` on top; overriding keys win.
    pub fn with_overrides<I, K, V>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.vars
            .extend(overrides.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    pub fn vars(&self) -> &BTreeMap<String, Value> {
        &self.vars
    }
}

/// Everything a task sees while it runs: the newest value of each direct
/// predecessor (keyed by predecessor id) and the shared [`Environment`].
#[derive(Debug, Clone)]
pub struct Context {
    task: TaskId,
    arguments: BTreeMap<TaskId, Value>,
    environment: Arc<Environment>,
}

impl Context {
    pub fn new(
        task: impl Into<TaskId>,
        arguments: BTreeMap<TaskId, Value>,
        environment: Arc<Environment>,
    ) -> Self {
        Self {
            task: task.into(),
            arguments,
            environment,
        }
    }

    /// Id of the task being invoked.
    pub fn task(&self) -> &str {
        &self.task
    }

    pub fn arguments(&self) -> &BTreeMap<TaskId, Value> {
        &self.arguments
    }

    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.arguments.get(name)
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Look `name` up in the arguments first, then in the environment.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.arguments
            .get(name)
            .or_else(|| self.environment.get(name))
    }
}
