// src/dag/matrix.rs

//! Boolean adjacency matrix over dense task slots.
//!
//! Row `i`, column `j` is set iff there is an edge from slot `i` to slot
//! `j`. All queries return slots in ascending order (or in input order for
//! [`AdjacencyMatrix::front_line`]) without duplicates.

use std::fmt;

use crate::errors::{LogflowError, Result};

pub type Slot = usize;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AdjacencyMatrix {
    nodes: usize,
    links: Vec<bool>,
}

impl AdjacencyMatrix {
    pub fn new(nodes: usize) -> Result<Self> {
        if nodes == 0 {
            return Err(LogflowError::Config(
                "adjacency matrix needs at least one node".to_string(),
            ));
        }
        Ok(Self {
            nodes,
            links: vec![false; nodes * nodes],
        })
    }

    /// Number of nodes (rows).
    pub fn len(&self) -> usize {
        self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes == 0
    }

    /// Number of cells.
    pub fn size(&self) -> usize {
        self.nodes * self.nodes
    }

    pub fn link(&mut self, from: Slot, to: Slot) -> Result<&mut Self> {
        let cell = self.cell(from, to)?;
        self.links[cell] = true;
        Ok(self)
    }

    pub fn is_linked(&self, from: Slot, to: Slot) -> bool {
        self.cell(from, to).map(|c| self.links[c]).unwrap_or(false)
    }

    fn cell(&self, from: Slot, to: Slot) -> Result<usize> {
        if from >= self.nodes || to >= self.nodes {
            return Err(LogflowError::Config(format!(
                "link {from} -> {to} is outside a {n}x{n} matrix",
                n = self.nodes
            )));
        }
        Ok(from * self.nodes + to)
    }

    /// Direct successors of `slot`.
    pub fn next_slots(&self, slot: Slot) -> Vec<Slot> {
        (0..self.nodes).filter(|&j| self.is_linked(slot, j)).collect()
    }

    /// Union of the direct successors of every slot in `slots`.
    pub fn next_slots_of(&self, slots: &[Slot]) -> Vec<Slot> {
        (0..self.nodes)
            .filter(|&j| slots.iter().any(|&i| self.is_linked(i, j)))
            .collect()
    }

    /// Direct predecessors of `slot`.
    pub fn previous_slots(&self, slot: Slot) -> Vec<Slot> {
        (0..self.nodes).filter(|&i| self.is_linked(i, slot)).collect()
    }

    /// Union of the direct predecessors of every slot in `slots`.
    pub fn previous_slots_of(&self, slots: &[Slot]) -> Vec<Slot> {
        (0..self.nodes)
            .filter(|&i| slots.iter().any(|&j| self.is_linked(i, j)))
            .collect()
    }

    /// Slots without predecessors.
    pub fn initial_slots(&self) -> Vec<Slot> {
        (0..self.nodes)
            .filter(|&j| (0..self.nodes).all(|i| !self.is_linked(i, j)))
            .collect()
    }

    /// Slots without successors.
    pub fn final_slots(&self) -> Vec<Slot> {
        (0..self.nodes)
            .filter(|&i| (0..self.nodes).all(|j| !self.is_linked(i, j)))
            .collect()
    }

    /// Drop every candidate that directly feeds another candidate.
    ///
    /// If a task and its dependent both completed, only the dependent marks
    /// new progress; the upstream one must not trigger its successors again.
    pub fn front_line(&self, candidates: &[Slot]) -> Vec<Slot> {
        let mut unique: Vec<Slot> = Vec::with_capacity(candidates.len());
        for &slot in candidates {
            if !unique.contains(&slot) {
                unique.push(slot);
            }
        }

        unique
            .iter()
            .copied()
            .filter(|&slot| !unique.iter().any(|&other| self.is_linked(slot, other)))
            .collect()
    }

    /// Successors of the front line whose predecessors are *all* in the
    /// front line (AND-join).
    pub fn nodes_to_process(&self, candidates: &[Slot]) -> Vec<Slot> {
        let front = self.front_line(candidates);
        self.next_slots_of(&front)
            .into_iter()
            .filter(|&slot| {
                self.previous_slots(slot)
                    .iter()
                    .all(|prev| front.contains(prev))
            })
            .collect()
    }
}

impl fmt::Display for AdjacencyMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "from (row) -> to (column)")?;
        for row in self.links.chunks(self.nodes) {
            let cells: Vec<&str> = row.iter().map(|&l| if l { "1" } else { "0" }).collect();
            writeln!(f, "        [{}]", cells.join(", "))?;
        }
        Ok(())
    }
}
