// src/log/mod.rs

//! Append-only logs of task results.
//!
//! - [`entry`] defines the immutable [`Entry`] record.
//! - [`index`] hands out strictly increasing entry indexes.
//! - [`memory`] holds the in-memory backends, all built on one generic
//!   [`MemoryLog`] over a pluggable [`Store`](memory::Store).
//! - [`file`] holds the durable, line-oriented [`FileLog`].
//!
//! Every backend implements [`Log`]. Scans visit entries newest first and
//! stop as soon as the filter reports completion. All backends guard their
//! contents with a task-fair reader/writer lock: appends are exclusive,
//! scans share the lock and never observe a half-written entry.

pub mod entry;
pub mod file;
pub mod index;
pub mod memory;

use std::fmt;
use std::path::Path;

use uuid::Uuid;

use crate::errors::{LogflowError, Result};
use crate::filter::{AllLatestValues, Filter};
use crate::types::{Discipline, IndexKind, LogKind};

pub use entry::{Entry, Index, Meta, Value};
pub use file::FileLog;
pub use index::IndexGenerator;
pub use memory::{ArrayLog, LatestLog, ListLog, MemoryLog, SortedSetLog};

pub trait Log: Send + Sync + fmt::Debug {
    fn id(&self) -> Uuid;

    /// Id of the log this one was forked from, if any.
    fn parent(&self) -> Option<Uuid>;

    fn discipline(&self) -> Discipline;

    /// A fresh index, strictly greater than any handed out before by this
    /// log (or by the log it was forked from, before the fork).
    fn next_index(&self) -> Result<Index>;

    /// Append a prebuilt entry. Its index must be greater than the index of
    /// the last appended entry.
    fn append(&self, entry: Entry) -> Result<()>;

    /// Assign the next index and append under one write lock, so that
    /// concurrent writers can never append out of order.
    fn record(&self, producer: &str, value: Value, meta: Meta) -> Result<Entry>;

    /// Visit entries newest first, collecting those `filter` accepts and
    /// stopping as soon as it reports completion.
    fn scan(&self, filter: &mut dyn Filter) -> Result<Vec<Entry>>;

    /// New log of the same backend with a fresh id, `parent` set to this
    /// log, and a copy of the entries `filter` accepts.
    fn fork(&self, filter: &mut dyn Filter) -> Result<Self>
    where
        Self: Sized;

    /// Fork keeping only the newest entry of every producer.
    fn fork_latest(&self) -> Result<Self>
    where
        Self: Sized,
    {
        self.fork(&mut AllLatestValues::new())
    }

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Release backend resources. A no-op for in-memory logs.
    fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// Reject an index that does not move the log forward.
pub(crate) fn ensure_ascending(last: Option<Index>, index: Index) -> Result<()> {
    match last {
        Some(last) if index <= last => Err(LogflowError::IndexOrder { index, last }),
        _ => Ok(()),
    }
}

/// Run `filter` over entries given newest first, honouring early completion.
pub(crate) fn select<'a>(
    entries: impl Iterator<Item = &'a Entry>,
    filter: &mut dyn Filter,
) -> Vec<Entry> {
    filter.reset();
    let mut selected = Vec::new();
    for entry in entries {
        if filter.test(entry) {
            selected.push(entry.clone());
        }
        if filter.complete() {
            break;
        }
    }
    selected
}

/// Open a log backend described by configuration.
///
/// `path` is only used by [`LogKind::File`], `capacity` only by
/// [`LogKind::Array`]; validation makes sure they are present when needed.
pub fn open_log(
    kind: LogKind,
    index: IndexKind,
    path: Option<&Path>,
    capacity: Option<usize>,
) -> Result<Box<dyn Log>> {
    let generator = IndexGenerator::from_kind(index);
    let log: Box<dyn Log> = match kind {
        LogKind::List => Box::new(ListLog::with_index(generator)),
        LogKind::Sorted => Box::new(SortedSetLog::with_index(generator)),
        LogKind::Latest => Box::new(LatestLog::with_index(generator)),
        LogKind::Array => {
            let capacity = capacity.ok_or_else(|| {
                LogflowError::Config("array log requires a capacity".to_string())
            })?;
            Box::new(ArrayLog::with_capacity_and_index(capacity, generator)?)
        }
        LogKind::File => {
            let path = path.ok_or_else(|| {
                LogflowError::Config("file log requires a path".to_string())
            })?;
            Box::new(FileLog::open_with_index(path, generator)?)
        }
    };
    Ok(log)
}
