// src/registry.rs

//! Maps service names used in flow files to task factories.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::config::FlowConfig;
use crate::dag::{Graph, GraphBuilder, Task};
use crate::errors::{LogflowError, Result};
use crate::log::Value;
use crate::services;

/// Builds a task from its id and its `args` table (as JSON).
pub type ServiceFactory = Arc<dyn Fn(&str, &Value) -> Result<Arc<dyn Task>> + Send + Sync>;

#[derive(Clone, Default)]
pub struct Registry {
    services: HashMap<String, ServiceFactory>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.services.keys().collect();
        names.sort();
        f.debug_struct("Registry").field("services", &names).finish()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every service in [`crate::services`].
    pub fn with_builtins() -> Self {
        Self::new()
            .register("constant", services::constant)
            .register("sum", services::sum)
            .register("multiply", services::multiply)
            .register("sub", services::sub)
            .register("null", services::null)
            .register("env", services::env)
    }

    /// Add or replace a service.
    pub fn register<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&str, &Value) -> Result<Arc<dyn Task>> + Send + Sync + 'static,
    {
        self.services.insert(name.into(), Arc::new(factory));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.services.contains_key(name)
    }

    /// Instantiate one task.
    pub fn create(&self, task: &str, service: &str, args: &Value) -> Result<Arc<dyn Task>> {
        let factory = self
            .services
            .get(service)
            .ok_or_else(|| LogflowError::UnknownService {
                task: task.to_string(),
                service: service.to_string(),
            })?;
        factory(task, args)
    }

    /// Turn a validated flow into a graph.
    pub fn resolve(&self, cfg: &FlowConfig) -> Result<Graph> {
        let mut builder = GraphBuilder::directed(cfg.flow.name.clone());

        for (id, task_cfg) in cfg.task.iter() {
            let args = serde_json::to_value(&task_cfg.args)?;
            let task = self.create(id, &task_cfg.service, &args)?;
            debug!(task = %id, service = %task_cfg.service, "task resolved");
            builder = builder.task(task);
        }

        for (id, task_cfg) in cfg.task.iter() {
            for dep in task_cfg.after.iter() {
                builder = builder.link(dep.clone(), id.clone());
            }
        }

        builder.build()
    }
}
