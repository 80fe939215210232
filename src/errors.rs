// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;
use uuid::Uuid;

use crate::log::Index;

#[derive(Error, Debug)]
pub enum LogflowError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Duplicate task id: {0}")]
    DuplicateTask(String),

    #[error("Task not found: {0}")]
    UnknownTask(String),

    #[error("Task '{task}' refers to unknown service '{service}'")]
    UnknownService { task: String, service: String },

    #[error("Cycle detected in graph: {0}")]
    DagCycle(String),

    #[error("Log capacity exceeded (capacity {capacity})")]
    CapacityExceeded { capacity: usize },

    #[error("Entry index {index} is not greater than last index {last}")]
    IndexOrder { index: Index, last: Index },

    #[error("Log {0} has been closed")]
    Closed(Uuid),

    #[error("Unable to fork log {log}: {source}")]
    Fork {
        log: Uuid,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Entry codec error: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Task '{task}' failed: {source:#}")]
    TaskFailed {
        task: String,
        #[source]
        source: anyhow::Error,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LogflowError {
    /// Whether the caller may retry the failed call against the same backend.
    ///
    /// Only I/O failures are transient; everything else is either a
    /// configuration problem or a task body error.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LogflowError::Io(_))
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, LogflowError>;
