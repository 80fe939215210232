// tests/frontier_properties.rs

mod common;

use std::collections::HashSet;
use std::sync::Arc;

use logflow::dag::{Graph, GraphBuilder};
use logflow::exec::{Environment, Executor, IncrementalExecutor};
use logflow::log::{ListLog, Log};
use logflow_test_utils::tasks;
use proptest::prelude::*;

// Acyclic by construction: task N only depends on tasks 0..N-1.
fn dag_strategy(max_tasks: usize) -> impl Strategy<Value = Vec<Vec<usize>>> {
    (1..=max_tasks).prop_flat_map(|num_tasks| {
        proptest::collection::vec(
            proptest::collection::vec(any::<usize>(), 0..num_tasks),
            num_tasks,
        )
        .prop_map(|raw| {
            raw.into_iter()
                .enumerate()
                .map(|(i, deps)| {
                    let mut valid: Vec<usize> = if i == 0 {
                        Vec::new()
                    } else {
                        deps.into_iter().map(|d| d % i).collect()
                    };
                    valid.sort();
                    valid.dedup();
                    valid
                })
                .collect()
        })
    })
}

fn name(i: usize) -> String {
    format!("task_{i:02}")
}

// Sources emit their position, everything else sums its inputs.
fn build(deps: &[Vec<usize>]) -> Graph {
    let mut builder = GraphBuilder::directed("generated");
    for (i, inputs) in deps.iter().enumerate() {
        let task = if inputs.is_empty() {
            tasks::constant(&name(i), i as i64)
        } else {
            tasks::sum(&name(i))
        };
        builder = builder.task(task);
        for d in inputs {
            builder = builder.link(name(*d), name(i));
        }
    }
    builder.build().expect("generated graph is acyclic")
}

fn subset(all: usize, picks: &[usize]) -> Vec<String> {
    let mut ids: Vec<String> = picks.iter().map(|p| name(p % all)).collect();
    ids.dedup();
    ids
}

proptest! {
    #[test]
    fn next_tasks_is_idempotent(deps in dag_strategy(10), picks in proptest::collection::vec(any::<usize>(), 0..6)) {
        let graph = build(&deps);
        let completed = subset(deps.len(), &picks);

        let first = common::ids(&graph.next_tasks(&completed));
        let second = common::ids(&graph.next_tasks(&completed));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn next_tasks_requires_the_whole_front_line(deps in dag_strategy(10), picks in proptest::collection::vec(any::<usize>(), 0..6)) {
        let graph = build(&deps);
        let completed = subset(deps.len(), &picks);
        let matrix = graph.matrix();

        let slots: Vec<usize> = completed
            .iter()
            .map(|id| id.trim_start_matches("task_").parse().unwrap())
            .collect();
        let front: HashSet<usize> = matrix.front_line(&slots).into_iter().collect();

        for slot in matrix.nodes_to_process(&slots) {
            for prev in matrix.previous_slots(slot) {
                prop_assert!(front.contains(&prev), "slot {} ran without input {}", slot, prev);
            }
        }
    }

    #[test]
    fn front_line_members_never_feed_each_other(deps in dag_strategy(10), picks in proptest::collection::vec(any::<usize>(), 0..8)) {
        let graph = build(&deps);
        let matrix = graph.matrix();
        let slots: Vec<usize> = picks.iter().map(|p| p % deps.len()).collect();

        let front = matrix.front_line(&slots);
        for &a in &front {
            prop_assert!(slots.contains(&a));
            for &b in &front {
                prop_assert!(!matrix.is_linked(a, b));
            }
        }
    }

    #[test]
    fn incremental_execution_terminates(deps in dag_strategy(8)) {
        let graph = build(&deps);
        let log = ListLog::new();
        let exec = IncrementalExecutor::new(Arc::new(Environment::empty()));

        // Every step appends at least one entry and a task never runs twice
        // before settling, so the number of steps is bounded by the task count.
        let mut steps = 0;
        loop {
            let report = exec.submit(&graph, &log).unwrap();
            steps += 1;
            if report.is_noop() {
                break;
            }
            prop_assert!(steps <= graph.len() + 1, "no convergence after {} steps", steps);
        }
        prop_assert!(log.len() <= graph.len());
        prop_assert!(exec.submit(&graph, &log).unwrap().is_noop());
    }
}
