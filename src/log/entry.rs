// src/log/entry.rs

//! Immutable log records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::TaskId;

/// Opaque payload carried by an [`Entry`].
pub use serde_json::Value;

/// Position of an entry inside its log. Strictly increasing per log.
pub type Index = u64;

/// Free-form metadata attached to an entry.
pub type Meta = BTreeMap<String, Value>;

/// One recorded result of a task execution.
///
/// Entries are never mutated once built; a newer value from the same
/// producer is a new entry with a higher index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    producer: TaskId,
    index: Index,
    value: Value,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    meta: Meta,
}

impl Entry {
    pub fn new(producer: impl Into<TaskId>, index: Index, value: impl Into<Value>) -> Self {
        Self {
            producer: producer.into(),
            index,
            value: value.into(),
            meta: Meta::new(),
        }
    }

    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    pub fn producer(&self) -> &str {
        &self.producer
    }

    pub fn index(&self) -> Index {
        self.index
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    /// Consume the entry, keeping only its payload.
    pub fn into_value(self) -> Value {
        self.value
    }
}
