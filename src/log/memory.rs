// src/log/memory.rs

//! In-memory log backends.
//!
//! One generic [`MemoryLog`] does the bookkeeping (identity, lineage,
//! indexes, locking); a [`Store`] decides how entries are kept:
//!
//! | alias            | store          | discipline   | notes                        |
//! |------------------|----------------|--------------|------------------------------|
//! | [`ArrayLog`]     | [`FixedStore`] | full history | fails once capacity is hit   |
//! | [`ListLog`]      | [`VecStore`]   | full history | grows without bound          |
//! | [`SortedSetLog`] | [`SortedStore`]| full history | ordered by index, not arrival|
//! | [`LatestLog`]    | [`LatestStore`]| latest only  | one entry per producer       |

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use parking_lot::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::errors::{LogflowError, Result};
use crate::filter::Filter;
use crate::log::{ensure_ascending, select, Entry, Index, IndexGenerator, Log, Meta, Value};
use crate::types::{Discipline, TaskId};

/// Backing storage for a [`MemoryLog`].
pub trait Store: Send + Sync + fmt::Debug {
    fn discipline(&self) -> Discipline;

    /// An empty store configured like this one (same capacity etc.).
    fn empty_like(&self) -> Self
    where
        Self: Sized;

    fn push(&mut self, entry: Entry) -> Result<()>;

    fn len(&self) -> usize;

    /// Entries from the highest index down to the lowest.
    fn newest_first(&self) -> Box<dyn Iterator<Item = &Entry> + '_>;
}

/// Fixed-capacity array of entries.
#[derive(Debug, Clone)]
pub struct FixedStore {
    capacity: usize,
    entries: Vec<Entry>,
}

impl FixedStore {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(LogflowError::Config(
                "array log capacity must be >= 1 (got 0)".to_string(),
            ));
        }
        Ok(Self {
            capacity,
            entries: Vec::with_capacity(capacity),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Store for FixedStore {
    fn discipline(&self) -> Discipline {
        Discipline::FullHistory
    }

    fn empty_like(&self) -> Self {
        Self {
            capacity: self.capacity,
            entries: Vec::with_capacity(self.capacity),
        }
    }

    fn push(&mut self, entry: Entry) -> Result<()> {
        if self.entries.len() >= self.capacity {
            return Err(LogflowError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        self.entries.push(entry);
        Ok(())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn newest_first(&self) -> Box<dyn Iterator<Item = &Entry> + '_> {
        Box::new(self.entries.iter().rev())
    }
}

/// Growable list of entries in arrival order.
#[derive(Debug, Clone, Default)]
pub struct VecStore {
    entries: Vec<Entry>,
}

impl Store for VecStore {
    fn discipline(&self) -> Discipline {
        Discipline::FullHistory
    }

    fn empty_like(&self) -> Self {
        Self::default()
    }

    fn push(&mut self, entry: Entry) -> Result<()> {
        self.entries.push(entry);
        Ok(())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn newest_first(&self) -> Box<dyn Iterator<Item = &Entry> + '_> {
        Box::new(self.entries.iter().rev())
    }
}

/// Entries keyed by index.
#[derive(Debug, Clone, Default)]
pub struct SortedStore {
    entries: BTreeMap<Index, Entry>,
}

impl Store for SortedStore {
    fn discipline(&self) -> Discipline {
        Discipline::FullHistory
    }

    fn empty_like(&self) -> Self {
        Self::default()
    }

    fn push(&mut self, entry: Entry) -> Result<()> {
        self.entries.insert(entry.index(), entry);
        Ok(())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn newest_first(&self) -> Box<dyn Iterator<Item = &Entry> + '_> {
        Box::new(self.entries.values().rev())
    }
}

/// Newest entry per producer; older ones are dropped on append.
#[derive(Debug, Clone, Default)]
pub struct LatestStore {
    entries: HashMap<TaskId, Entry>,
}

impl Store for LatestStore {
    fn discipline(&self) -> Discipline {
        Discipline::LatestOnly
    }

    fn empty_like(&self) -> Self {
        Self::default()
    }

    fn push(&mut self, entry: Entry) -> Result<()> {
        self.entries.insert(entry.producer().to_string(), entry);
        Ok(())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn newest_first(&self) -> Box<dyn Iterator<Item = &Entry> + '_> {
        let mut entries: Vec<&Entry> = self.entries.values().collect();
        entries.sort_by(|a, b| b.index().cmp(&a.index()));
        Box::new(entries.into_iter())
    }
}

#[derive(Debug)]
struct State<S> {
    store: S,
    last: Option<Index>,
}

impl<S: Store> State<S> {
    fn push(&mut self, entry: Entry) -> Result<()> {
        ensure_ascending(self.last, entry.index())?;
        let index = entry.index();
        self.store.push(entry)?;
        self.last = Some(index);
        Ok(())
    }
}

/// In-memory [`Log`] over any [`Store`].
#[derive(Debug)]
pub struct MemoryLog<S> {
    id: Uuid,
    parent: Option<Uuid>,
    index: IndexGenerator,
    state: RwLock<State<S>>,
}

pub type ArrayLog = MemoryLog<FixedStore>;
pub type ListLog = MemoryLog<VecStore>;
pub type SortedSetLog = MemoryLog<SortedStore>;
pub type LatestLog = MemoryLog<LatestStore>;

impl<S: Store> MemoryLog<S> {
    pub fn with_store(store: S, index: IndexGenerator) -> Self {
        Self {
            id: Uuid::new_v4(),
            parent: None,
            index,
            state: RwLock::new(State { store, last: None }),
        }
    }
}

impl<S: Store + Default> MemoryLog<S> {
    pub fn new() -> Self {
        Self::with_store(S::default(), IndexGenerator::default())
    }

    pub fn with_index(index: IndexGenerator) -> Self {
        Self::with_store(S::default(), index)
    }
}

impl<S: Store + Default> Default for MemoryLog<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLog<FixedStore> {
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::with_capacity_and_index(capacity, IndexGenerator::default())
    }

    pub fn with_capacity_and_index(capacity: usize, index: IndexGenerator) -> Result<Self> {
        Ok(Self::with_store(FixedStore::new(capacity)?, index))
    }

    pub fn capacity(&self) -> usize {
        self.state.read().store.capacity()
    }
}

impl<S: Store> Log for MemoryLog<S> {
    fn id(&self) -> Uuid {
        self.id
    }

    fn parent(&self) -> Option<Uuid> {
        self.parent
    }

    fn discipline(&self) -> Discipline {
        self.state.read().store.discipline()
    }

    fn next_index(&self) -> Result<Index> {
        self.index.next()
    }

    fn append(&self, entry: Entry) -> Result<()> {
        let index = entry.index();
        let mut state = self.state.write();
        state.push(entry)?;
        // Still under the lock: a concurrent `record` must see the bump.
        self.index.observe(index);
        Ok(())
    }

    fn record(&self, producer: &str, value: Value, meta: Meta) -> Result<Entry> {
        let mut state = self.state.write();
        let entry = Entry::new(producer, self.index.next()?, value).with_meta(meta);
        state.push(entry.clone())?;
        debug!(log = %self.id, task = %producer, index = entry.index(), "entry recorded");
        Ok(entry)
    }

    fn scan(&self, filter: &mut dyn Filter) -> Result<Vec<Entry>> {
        let state = self.state.read();
        Ok(select(state.store.newest_first(), filter))
    }

    fn fork(&self, filter: &mut dyn Filter) -> Result<Self> {
        let state = self.state.read();
        let mut forked = State {
            store: state.store.empty_like(),
            last: None,
        };

        let selected = select(state.store.newest_first(), filter);
        for entry in selected.into_iter().rev() {
            forked.push(entry)?;
        }

        let log = Self {
            id: Uuid::new_v4(),
            parent: Some(self.id),
            index: self.index.fork(),
            state: RwLock::new(forked),
        };
        debug!(parent = %self.id, log = %log.id, entries = log.len(), "log forked");
        Ok(log)
    }

    fn len(&self) -> usize {
        self.state.read().store.len()
    }
}
