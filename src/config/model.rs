// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::types::{IndexKind, LogKind};

/// Flow description as read from a TOML file, before validation.
///
/// ```toml
/// [flow]
/// name = "arithmetic"
///
/// [log]
/// backend = "file"
/// path = "runs/arith.jsonl"
///
/// [env]
/// SCALE = "3"
///
/// [task.a]
/// service = "constant"
/// args = { value = 2 }
///
/// [task.sum]
/// service = "sum"
/// after = ["a", "b"]
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFlowConfig {
    #[serde(default)]
    pub flow: FlowSection,

    #[serde(default)]
    pub log: LogSection,

    /// Values layered over the process environment.
    #[serde(default)]
    pub env: BTreeMap<String, String>,

    /// Tasks keyed by id.
    #[serde(default)]
    pub task: BTreeMap<String, TaskConfig>,
}

/// Validated flow description. Build one with `FlowConfig::try_from(raw)`.
#[derive(Debug, Clone)]
pub struct FlowConfig {
    pub flow: FlowSection,
    pub log: LogSection,
    pub env: BTreeMap<String, String>,
    pub task: BTreeMap<String, TaskConfig>,
}

impl FlowConfig {
    /// Construct without validation. Only the validation code should call
    /// this.
    pub(crate) fn new_unchecked(raw: RawFlowConfig) -> Self {
        Self {
            flow: raw.flow,
            log: raw.log,
            env: raw.env,
            task: raw.task,
        }
    }
}

/// `[flow]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlowSection {
    /// Becomes the graph name.
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub version: Option<String>,
}

/// `[log]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogSection {
    #[serde(default)]
    pub backend: LogKind,

    #[serde(default)]
    pub index: IndexKind,

    /// Location of the log file; `file` backend only.
    ///
    /// Relative paths are taken relative to the config file.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Fixed number of entries; `array` backend only.
    #[serde(default)]
    pub capacity: Option<usize>,
}

/// `[task.<id>]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskConfig {
    /// Name of the registered service that implements the task.
    pub service: String,

    /// Service-specific settings.
    #[serde(default)]
    pub args: toml::Table,

    /// Tasks whose values this one consumes; each adds an edge into it.
    #[serde(default)]
    pub after: Vec<String>,
}
