// src/dag/graph.rs

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::warn;

use crate::dag::matrix::{AdjacencyMatrix, Slot};
use crate::dag::task::Task;
use crate::types::TaskId;

/// Immutable task topology.
///
/// Each task owns a dense slot; edges live in an [`AdjacencyMatrix`].
/// Built through [`GraphBuilder`](crate::dag::GraphBuilder), which
/// guarantees unique ids, known edge endpoints and acyclicity.
pub struct Graph {
    name: String,
    tasks: Vec<Arc<dyn Task>>,
    slots: HashMap<TaskId, Slot>,
    matrix: AdjacencyMatrix,
    order: Vec<Slot>,
}

impl Graph {
    pub(crate) fn new(
        name: String,
        tasks: Vec<Arc<dyn Task>>,
        matrix: AdjacencyMatrix,
        order: Vec<Slot>,
    ) -> Self {
        let slots = tasks
            .iter()
            .enumerate()
            .map(|(slot, task)| (task.id().to_string(), slot))
            .collect();
        Self {
            name,
            tasks,
            slots,
            matrix,
            order,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.slots.contains_key(id)
    }

    pub fn task(&self, id: &str) -> Option<&Arc<dyn Task>> {
        self.slots.get(id).map(|&slot| &self.tasks[slot])
    }

    /// All tasks in slot order.
    pub fn tasks(&self) -> impl Iterator<Item = &Arc<dyn Task>> {
        self.tasks.iter()
    }

    pub fn matrix(&self) -> &AdjacencyMatrix {
        &self.matrix
    }

    /// Tasks ordered so that every task comes after all its predecessors.
    pub fn topological_order(&self) -> Vec<Arc<dyn Task>> {
        self.resolve(&self.order)
    }

    /// All edges as `(from, to)` id pairs.
    pub fn edges(&self) -> Vec<(TaskId, TaskId)> {
        let mut edges = Vec::new();
        for (from, task) in self.tasks.iter().enumerate() {
            for to in self.matrix.next_slots(from) {
                edges.push((task.id().to_string(), self.tasks[to].id().to_string()));
            }
        }
        edges
    }

    /// Source tasks: no incoming edges.
    pub fn initial_tasks(&self) -> Vec<Arc<dyn Task>> {
        self.resolve(&self.matrix.initial_slots())
    }

    /// Destination tasks: no outgoing edges.
    pub fn final_tasks(&self) -> Vec<Arc<dyn Task>> {
        self.resolve(&self.matrix.final_slots())
    }

    /// Direct successors of one task.
    pub fn successors(&self, id: &str) -> Vec<Arc<dyn Task>> {
        match self.slots.get(id) {
            Some(&slot) => self.resolve(&self.matrix.next_slots(slot)),
            None => Vec::new(),
        }
    }

    /// Direct predecessors of one task.
    pub fn predecessors(&self, id: &str) -> Vec<Arc<dyn Task>> {
        match self.slots.get(id) {
            Some(&slot) => self.resolve(&self.matrix.previous_slots(slot)),
            None => Vec::new(),
        }
    }

    /// Ids of the direct predecessors of one task.
    pub fn predecessor_ids(&self, id: &str) -> Vec<TaskId> {
        self.predecessors(id)
            .iter()
            .map(|task| task.id().to_string())
            .collect()
    }

    /// Union of the direct predecessors of `ids`.
    pub fn previous_tasks<I, S>(&self, ids: I) -> Vec<Arc<dyn Task>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let slots = self.slots_of(ids);
        self.resolve(&self.matrix.previous_slots_of(&slots))
    }

    /// Tasks that may run now, given that `completed` are the producers that
    /// most recently completed. See [`AdjacencyMatrix::nodes_to_process`].
    ///
    /// Ids that are not part of the graph are ignored.
    pub fn next_tasks<I, S>(&self, completed: I) -> Vec<Arc<dyn Task>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let slots = self.slots_of(completed);
        if slots.is_empty() {
            return Vec::new();
        }
        self.resolve(&self.matrix.nodes_to_process(&slots))
    }

    fn slots_of<I, S>(&self, ids: I) -> Vec<Slot>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ids.into_iter()
            .filter_map(|id| {
                let slot = self.slots.get(id.as_ref()).copied();
                if slot.is_none() {
                    warn!(graph = %self.name, task = %id.as_ref(), "id not in graph; ignored");
                }
                slot
            })
            .collect()
    }

    fn resolve(&self, slots: &[Slot]) -> Vec<Arc<dyn Task>> {
        slots.iter().map(|&slot| Arc::clone(&self.tasks[slot])).collect()
    }
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<&str> = self.tasks.iter().map(|t| t.id()).collect();
        f.debug_struct("Graph")
            .field("name", &self.name)
            .field("tasks", &ids)
            .field("edges", &self.edges())
            .finish()
    }
}
