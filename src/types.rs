// src/types.rs

use std::fmt;

use serde::Deserialize;

/// Identifier of a task, and of the entries it produces.
pub type TaskId = String;

/// How a backend treats several entries from the same producer.
///
/// Scheduling needs "the newest entry per producer"; both disciplines can
/// answer that, but only `FullHistory` can answer anything older.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discipline {
    /// Every entry is kept; scans see the whole history.
    FullHistory,
    /// One entry per producer; an append replaces the previous one.
    LatestOnly,
}

/// Log backend selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    #[default]
    List,
    Array,
    Sorted,
    Latest,
    File,
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogKind::List => "list",
            LogKind::Array => "array",
            LogKind::Sorted => "sorted",
            LogKind::Latest => "latest",
            LogKind::File => "file",
        };
        f.write_str(name)
    }
}

/// Source of entry indexes selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    #[default]
    Counter,
    Clock,
}
