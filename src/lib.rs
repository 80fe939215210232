// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod filter;
pub mod log;
pub mod logging;
pub mod registry;
pub mod services;
pub mod types;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::{FlowConfig, load_and_validate};
use crate::dag::Graph;
use crate::engine::{Runner, final_results};
use crate::exec::Environment;
use crate::log::{Log, open_log};
use crate::registry::Registry;

/// High-level entry point used by `main.rs`.
///
/// Loads the flow, builds the graph from the built-in services, opens the
/// configured log and drives the chosen strategy until the run settles.
/// The newest value of every final task is printed to stdout, one JSON
/// entry per line.
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;
    let graph = Registry::with_builtins().resolve(&cfg)?;

    if args.dry_run {
        print_dry_run(&cfg, &graph);
        return Ok(());
    }

    let environment = Environment::capture().with_overrides(cfg.env.clone());
    let log: Arc<dyn Log> = Arc::from(open_log(
        cfg.log.backend,
        cfg.log.index,
        cfg.log.path.as_deref(),
        cfg.log.capacity,
    )?);
    info!(log = %log.id(), backend = %cfg.log.backend, entries = log.len(), "log ready");

    let mut runner = Runner::new(args.strategy, Arc::new(environment)).resuming(args.resume);
    if let Some(steps) = args.steps {
        runner = runner.with_max_steps(steps);
    }

    let graph = Arc::new(graph);
    let summary = runner.run(Arc::clone(&graph), Arc::clone(&log)).await?;
    if !summary.settled {
        warn!(steps = summary.steps, "stopped before the run settled");
    }

    for entry in final_results(&graph, log.as_ref())? {
        println!("{}", serde_json::to_string(&entry)?);
    }

    log.close()?;
    Ok(())
}

/// Print the resolved graph without running anything.
fn print_dry_run(cfg: &FlowConfig, graph: &Graph) {
    println!("logflow dry-run");
    println!("  flow.name = {}", cfg.flow.name);
    if let Some(ref version) = cfg.flow.version {
        println!("  flow.version = {version}");
    }
    println!("  log.backend = {}", cfg.log.backend);
    if let Some(ref path) = cfg.log.path {
        println!("  log.path = {}", path.display());
    }
    println!();

    println!("tasks ({}), in topological order:", graph.len());
    for task in graph.topological_order() {
        let id = task.id();
        println!("  - {id}");
        if let Some(task_cfg) = cfg.task.get(id) {
            println!("      service: {}", task_cfg.service);
        }
        let inputs = graph.predecessor_ids(id);
        if !inputs.is_empty() {
            println!("      after: {inputs:?}");
        }
    }
    println!();

    println!("edges:");
    for (from, to) in graph.edges() {
        println!("  {from} -> {to}");
    }

    debug!("dry-run complete (no execution)");
}
