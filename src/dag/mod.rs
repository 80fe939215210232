// src/dag/mod.rs

//! Task topology.
//!
//! - [`task`] defines the [`Task`] contract and a closure-backed task.
//! - [`matrix`] holds the adjacency matrix and the readiness queries
//!   (front line, nodes to process) the incremental executor is built on.
//! - [`graph`] is the immutable, id-addressed view over the matrix.
//! - [`builder`] validates tasks and edges and produces a [`Graph`].

pub mod builder;
pub mod graph;
pub mod matrix;
pub mod task;

pub use builder::GraphBuilder;
pub use graph::Graph;
pub use matrix::{AdjacencyMatrix, Slot};
pub use task::{FnTask, Output, Task};
