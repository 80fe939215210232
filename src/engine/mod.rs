// src/engine/mod.rs

//! Drives an executor over a graph and log until the run settles.
//!
//! The executors in [`crate::exec`] each perform a single step; [`Runner`]
//! decides how many steps to take and when to stop. [`final_results`] reads
//! the outcome back out of the log.

pub mod results;
pub mod runner;

use std::fmt;

use clap::ValueEnum;

pub use results::final_results;
pub use runner::{RunSummary, Runner};

/// How tasks get scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Strategy {
    /// One frontier layer per step, tasks run one after another.
    #[default]
    Incremental,
    /// Depth-first from the sources in a single step.
    Push,
    /// One frontier layer per step, tasks of a layer run concurrently.
    Parallel,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Incremental => "incremental",
            Strategy::Push => "push",
            Strategy::Parallel => "parallel",
        };
        f.write_str(name)
    }
}
