// src/filter.rs

//! Stateful scan predicates.
//!
//! A [`Filter`] is handed every entry a scan visits, newest first, and may
//! declare the scan finished early through [`Filter::complete`]. That early
//! stop is what keeps "latest value of these N producers" proportional to
//! how far back those producers last wrote, not to the size of the log.
//!
//! Filters carry per-scan state. Logs call [`Filter::reset`] before every
//! scan, so one instance can be reused for consecutive scans, but never for
//! two concurrent ones.

use std::collections::HashSet;
use std::fmt;

use crate::log::Entry;
use crate::types::TaskId;

pub trait Filter {
    /// Whether `entry` belongs in the scan result.
    fn test(&mut self, entry: &Entry) -> bool;

    /// Whether the scan can stop now. Checked after every `test`.
    fn complete(&self) -> bool {
        false
    }

    /// Forget state accumulated by a previous scan.
    fn reset(&mut self) {}
}

/// Matches the first entry seen for every producer, i.e. the newest one.
///
/// Never completes: only a full scan proves every producer was covered.
#[derive(Debug, Default, Clone)]
pub struct AllLatestValues {
    seen: HashSet<TaskId>,
}

impl AllLatestValues {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Filter for AllLatestValues {
    fn test(&mut self, entry: &Entry) -> bool {
        if self.seen.contains(entry.producer()) {
            return false;
        }
        self.seen.insert(entry.producer().to_string());
        true
    }

    fn reset(&mut self) {
        self.seen.clear();
    }
}

/// Newest entry of each producer in a fixed set; complete once every one
/// of them has matched.
///
/// An empty producer set is complete before the first entry is visited.
#[derive(Debug, Clone)]
pub struct LatestValuesForProducers {
    wanted: HashSet<TaskId>,
    found: HashSet<TaskId>,
}

impl LatestValuesForProducers {
    pub fn new<I, S>(producers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<TaskId>,
    {
        let wanted: HashSet<TaskId> = producers.into_iter().map(Into::into).collect();
        let found = HashSet::with_capacity(wanted.len());
        Self { wanted, found }
    }

    /// Producers that have not matched yet in the current scan.
    pub fn missing(&self) -> impl Iterator<Item = &str> {
        self.wanted
            .iter()
            .filter(|p| !self.found.contains(*p))
            .map(String::as_str)
    }
}

impl Filter for LatestValuesForProducers {
    fn test(&mut self, entry: &Entry) -> bool {
        if self.complete() || self.found.contains(entry.producer()) {
            return false;
        }
        if !self.wanted.contains(entry.producer()) {
            return false;
        }
        self.found.insert(entry.producer().to_string());
        true
    }

    fn complete(&self) -> bool {
        self.found.len() == self.wanted.len()
    }

    fn reset(&mut self) {
        self.found.clear();
    }
}

/// Every entry whose producer is in a fixed set. Never completes early.
#[derive(Debug, Clone)]
pub struct ProducerIdFilter {
    producers: HashSet<TaskId>,
}

impl ProducerIdFilter {
    pub fn new<I, S>(producers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<TaskId>,
    {
        Self {
            producers: producers.into_iter().map(Into::into).collect(),
        }
    }
}

impl Filter for ProducerIdFilter {
    fn test(&mut self, entry: &Entry) -> bool {
        self.producers.contains(entry.producer())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PassAll;

impl Filter for PassAll {
    fn test(&mut self, _entry: &Entry) -> bool {
        true
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RefuseAll;

impl Filter for RefuseAll {
    fn test(&mut self, _entry: &Entry) -> bool {
        false
    }
}

/// Stateless filter from a closure.
pub struct FnFilter<F> {
    predicate: F,
}

impl<F> fmt::Debug for FnFilter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnFilter").finish_non_exhaustive()
    }
}

impl<F> Filter for FnFilter<F>
where
    F: FnMut(&Entry) -> bool,
{
    fn test(&mut self, entry: &Entry) -> bool {
        (self.predicate)(entry)
    }
}

/// Build a filter from a predicate over entries.
pub fn from_fn<F>(predicate: F) -> FnFilter<F>
where
    F: FnMut(&Entry) -> bool,
{
    FnFilter { predicate }
}
