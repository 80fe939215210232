// src/dag/builder.rs

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use tracing::debug;

use crate::dag::graph::Graph;
use crate::dag::matrix::{AdjacencyMatrix, Slot};
use crate::dag::task::Task;
use crate::errors::{LogflowError, Result};
use crate::types::TaskId;

/// Collects tasks and edges, then freezes them into a [`Graph`].
///
/// Nothing is checked until [`GraphBuilder::build`], which rejects:
/// - a blank graph name or a graph without tasks,
/// - two distinct task instances sharing an id,
/// - edges naming a task that was never added,
/// - cycles (including self-loops).
#[derive(Debug, Default)]
pub struct GraphBuilder {
    name: String,
    tasks: Vec<Arc<dyn Task>>,
    links: Vec<(TaskId, TaskId)>,
}

impl GraphBuilder {
    pub fn directed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add a task, with or without edges. Adding the same instance twice
    /// is harmless.
    pub fn task(mut self, task: Arc<dyn Task>) -> Self {
        self.add(task);
        self
    }

    /// Add both tasks and an edge `from -> to`.
    pub fn connect(mut self, from: &Arc<dyn Task>, to: &Arc<dyn Task>) -> Self {
        self.add(Arc::clone(from));
        self.add(Arc::clone(to));
        self.links
            .push((from.id().to_string(), to.id().to_string()));
        self
    }

    /// Add an edge between tasks referenced by id.
    pub fn link(mut self, from: impl Into<TaskId>, to: impl Into<TaskId>) -> Self {
        self.links.push((from.into(), to.into()));
        self
    }

    fn add(&mut self, task: Arc<dyn Task>) {
        let ptr = Arc::as_ptr(&task) as *const ();
        if !self
            .tasks
            .iter()
            .any(|t| std::ptr::eq(Arc::as_ptr(t) as *const (), ptr))
        {
            self.tasks.push(task);
        }
    }

    pub fn build(self) -> Result<Graph> {
        if self.name.trim().is_empty() {
            return Err(LogflowError::Config(
                "graph name can not be blank".to_string(),
            ));
        }
        if self.tasks.is_empty() {
            return Err(LogflowError::Config(format!(
                "graph '{}' has no tasks",
                self.name
            )));
        }

        let mut slots: HashMap<&str, Slot> = HashMap::with_capacity(self.tasks.len());
        for (slot, task) in self.tasks.iter().enumerate() {
            if task.id().trim().is_empty() {
                return Err(LogflowError::Config(format!(
                    "graph '{}' contains a task with a blank id",
                    self.name
                )));
            }
            if slots.insert(task.id(), slot).is_some() {
                return Err(LogflowError::DuplicateTask(task.id().to_string()));
            }
        }

        let mut matrix = AdjacencyMatrix::new(self.tasks.len())?;
        let mut dag: DiGraphMap<Slot, ()> = DiGraphMap::new();
        for slot in 0..self.tasks.len() {
            dag.add_node(slot);
        }

        let mut seen = HashSet::new();
        for (from, to) in &self.links {
            let from_slot = *slots
                .get(from.as_str())
                .ok_or_else(|| LogflowError::UnknownTask(from.clone()))?;
            let to_slot = *slots
                .get(to.as_str())
                .ok_or_else(|| LogflowError::UnknownTask(to.clone()))?;
            if seen.insert((from_slot, to_slot)) {
                matrix.link(from_slot, to_slot)?;
                dag.add_edge(from_slot, to_slot, ());
            }
        }

        let order = toposort(&dag, None).map_err(|cycle| {
            LogflowError::DagCycle(format!(
                "cycle detected in graph '{}' involving task '{}'",
                self.name,
                self.tasks[cycle.node_id()].id()
            ))
        })?;

        debug!(
            graph = %self.name,
            tasks = self.tasks.len(),
            edges = seen.len(),
            "graph built"
        );

        Ok(Graph::new(self.name, self.tasks, matrix, order))
    }
}
