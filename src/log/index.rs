// src/log/index.rs

//! Strictly increasing index sources.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::errors::{LogflowError, Result};
use crate::log::Index;
use crate::types::IndexKind;

/// Hands out indexes for one log instance.
///
/// Every call to [`IndexGenerator::next`] returns a value strictly greater
/// than all values returned before, and a [`fork`](IndexGenerator::fork)
/// continues where the parent is, so a forked log never reuses an index
/// its parent could still hand out.
#[derive(Debug)]
pub enum IndexGenerator {
    /// Plain counter starting at zero.
    Counter(AtomicU64),
    /// Wall-clock nanoseconds, bumped by one whenever the clock has not
    /// moved past the previous value.
    Clock(AtomicU64),
}

impl IndexGenerator {
    pub fn counter() -> Self {
        IndexGenerator::Counter(AtomicU64::new(0))
    }

    pub fn clock() -> Self {
        IndexGenerator::Clock(AtomicU64::new(0))
    }

    pub fn from_kind(kind: IndexKind) -> Self {
        match kind {
            IndexKind::Counter => Self::counter(),
            IndexKind::Clock => Self::clock(),
        }
    }


    pub fn next(&self) -> Result<Index> {
        match self {
            IndexGenerator::Counter(counter) => {
                let current = counter
                    .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_add(1))
                    .map_err(|_| LogflowError::CapacityExceeded {
                        capacity: usize::MAX,
                    })?;
                Ok(current)
            }
            IndexGenerator::Clock(last) => {
                let now = now_nanos();
                let previous = last
                    .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |prev| {
                        if now > prev {
                            Some(now)
                        } else {
                            prev.checked_add(1)
                        }
                    })
                    .map_err(|_| LogflowError::CapacityExceeded {
                        capacity: usize::MAX,
                    })?;
                Ok(if now > previous { now } else { previous + 1 })
            }
        }
    }

    /// Make sure every later index is strictly greater than `index`.
    ///
    /// Used when entries with externally assigned indexes are appended or
    /// recovered from disk.
    pub fn observe(&self, index: Index) {
        match self {
            IndexGenerator::Counter(counter) => {
                counter.fetch_max(index.saturating_add(1), Ordering::SeqCst);
            }
            IndexGenerator::Clock(last) => {
                last.fetch_max(index, Ordering::SeqCst);
            }
        }
    }

    /// Generator for a forked log, continuing from this one's state.
    pub fn fork(&self) -> Self {
        match self {
            IndexGenerator::Counter(counter) => {
                IndexGenerator::Counter(AtomicU64::new(counter.load(Ordering::SeqCst)))
            }
            IndexGenerator::Clock(last) => {
                IndexGenerator::Clock(AtomicU64::new(last.load(Ordering::SeqCst)))
            }
        }
    }
}

impl Default for IndexGenerator {
    fn default() -> Self {
        Self::counter()
    }
}

fn now_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
