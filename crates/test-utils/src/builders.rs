#![allow(dead_code)]

use logflow::config::{FlowConfig, RawFlowConfig, TaskConfig};
use logflow::types::{IndexKind, LogKind};
use std::path::PathBuf;

/// Builder for `FlowConfig` to simplify test setup.
pub struct FlowConfigBuilder {
    config: RawFlowConfig,
}

impl FlowConfigBuilder {
    pub fn new(name: &str) -> Self {
        let mut config = RawFlowConfig::default();
        config.flow.name = name.to_string();
        Self { config }
    }

    pub fn with_task(mut self, id: &str, task: TaskConfig) -> Self {
        self.config.task.insert(id.to_string(), task);
        self
    }

    pub fn with_backend(mut self, backend: LogKind) -> Self {
        self.config.log.backend = backend;
        self
    }

    pub fn with_index(mut self, index: IndexKind) -> Self {
        self.config.log.index = index;
        self
    }

    pub fn with_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.log.path = Some(path.into());
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.config.log.capacity = Some(capacity);
        self
    }

    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.config.env.insert(key.to_string(), value.to_string());
        self
    }

    pub fn raw(self) -> RawFlowConfig {
        self.config
    }

    pub fn build(self) -> FlowConfig {
        FlowConfig::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

/// Builder for `TaskConfig`.
pub struct TaskConfigBuilder {
    task: TaskConfig,
}

impl TaskConfigBuilder {
    pub fn new(service: &str) -> Self {
        Self {
            task: TaskConfig {
                service: service.to_string(),
                args: toml::Table::new(),
                after: vec![],
            },
        }
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.task.after.push(dep.to_string());
        self
    }

    pub fn arg(mut self, key: &str, value: impl Into<toml::Value>) -> Self {
        self.task.args.insert(key.to_string(), value.into());
        self
    }

    pub fn build(self) -> TaskConfig {
        self.task
    }
}
