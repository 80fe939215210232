// src/exec/report.rs

use crate::types::TaskId;

/// What one executor call did.
///
/// Declined and blocked tasks are normal stopping points, not errors: they
/// resolve themselves once the missing data shows up in the log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Tasks whose output was appended to the log, in invocation order.
    pub completed: Vec<TaskId>,
    /// Tasks that ran but produced no value.
    pub declined: Vec<TaskId>,
    /// Tasks that were reached but lacked some inputs, and never ran during
    /// this call.
    pub blocked: Vec<TaskId>,
}

impl StepReport {
    /// True when the call appended nothing.
    pub fn is_noop(&self) -> bool {
        self.completed.is_empty()
    }

    /// Fold a later step into this one.
    pub fn merge(&mut self, other: StepReport) {
        self.completed.extend(other.completed);
        self.declined.extend(other.declined);
        self.blocked.extend(other.blocked);
        self.settle();
    }

    /// Drop blocked tasks that completed later in the same call, and
    /// repeated mentions.
    pub(crate) fn settle(&mut self) {
        let completed = &self.completed;
        self.blocked.retain(|t| !completed.contains(t));
        dedup_in_order(&mut self.blocked);
        dedup_in_order(&mut self.declined);
    }
}

fn dedup_in_order(ids: &mut Vec<TaskId>) {
    let mut seen = std::collections::HashSet::new();
    ids.retain(|id| seen.insert(id.clone()));
}
