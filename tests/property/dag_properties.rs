// tests/property/dag_properties.rs

use std::collections::{HashMap, HashSet};

use petgraph::algo::{has_path_connecting, is_cyclic_directed, toposort};
use petgraph::graphmap::DiGraphMap;
use proptest::prelude::*;

use crate::common::check_invariants;
use crate::strategies::{build_store, dag_spec_strategy, status_strategy, task_name};
use taskdag::dag::{
    TaskDag, TaskDagStore, compute_dag_stats, find_critical_path, find_parallel_groups,
    get_blocking_tasks, topological_sort, would_create_cycle,
};
use taskdag::errors::DagError;

/// Independent view of the same graph for cross-checking.
fn oracle(dag: &TaskDag) -> DiGraphMap<&str, ()> {
    let mut graph = DiGraphMap::new();
    for id in dag.task_ids() {
        graph.add_node(id);
    }
    for edge in dag.edges() {
        graph.add_edge(edge.from_task_id(), edge.to_task_id(), ());
    }
    graph
}

/// Longest chain length computed over the oracle graph.
fn oracle_longest_chain(dag: &TaskDag) -> usize {
    let graph = oracle(dag);
    let order = toposort(&graph, None).expect("oracle graph is acyclic");
    let mut depth: HashMap<&str, usize> = HashMap::new();
    for id in order {
        let d = graph
            .neighbors_directed(id, petgraph::Direction::Incoming)
            .map(|p| depth[p] + 1)
            .max()
            .unwrap_or(1);
        depth.insert(id, d);
    }
    depth.values().copied().max().unwrap_or(0)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn random_insertions_never_create_cycles(
        num_tasks in 1..12usize,
        pairs in proptest::collection::vec((0..12usize, 0..12usize), 0..40),
    ) {
        let mut store = TaskDagStore::new("prop");
        let mut shadow: DiGraphMap<usize, ()> = DiGraphMap::new();
        for i in 0..num_tasks {
            store.add_task(format!("t{i}")).unwrap();
            shadow.add_node(i);
        }

        for (a, b) in pairs {
            let (from, to) = (format!("t{a}"), format!("t{b}"));
            let result = store.add_dependency(&from, &to);

            if a >= num_tasks || b >= num_tasks {
                prop_assert!(matches!(result, Err(DagError::UnknownTask(_))));
            } else if a == b {
                prop_assert_eq!(result, Err(DagError::SelfDependency(from.clone())));
            } else if shadow.contains_edge(a, b) {
                prop_assert!(matches!(result, Err(DagError::DuplicateEdge { .. })), "expected DuplicateEdge, got {:?}", result);
            } else if has_path_connecting(&shadow, b, a, None) {
                prop_assert!(matches!(result, Err(DagError::Cycle { .. })), "expected Cycle, got {:?}", result);
            } else {
                prop_assert!(result.is_ok(), "unexpected rejection: {:?}", result);
                shadow.add_edge(a, b, ());
            }
        }

        prop_assert!(!is_cyclic_directed(&shadow));
        prop_assert!(!is_cyclic_directed(&oracle(store.dag())));
        prop_assert_eq!(store.dag().edge_count(), shadow.edge_count());
        prop_assert!(topological_sort(store.dag()).is_ok());
        if let Err(violation) = check_invariants(store.dag()) {
            prop_assert!(false, "{}", violation);
        }
    }

    #[test]
    fn sort_is_a_topological_permutation(spec in dag_spec_strategy(16)) {
        let store = build_store(&spec);
        let dag = store.dag();
        let schedule = topological_sort(dag).unwrap();

        prop_assert_eq!(schedule.order.len(), dag.len());
        let position: HashMap<&str, usize> = schedule
            .order
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_str(), i))
            .collect();
        prop_assert_eq!(position.len(), dag.len());

        for edge in dag.edges() {
            prop_assert!(
                position[edge.from_task_id()] < position[edge.to_task_id()],
                "edge {} out of order", edge.id()
            );
        }

        let partitioned = schedule.ready_tasks.len()
            + schedule.blocked_tasks.len()
            + schedule.completed_tasks.len();
        prop_assert_eq!(partitioned, dag.len());
    }

    #[test]
    fn reversing_any_edge_is_a_cycle(spec in dag_spec_strategy(16)) {
        let store = build_store(&spec);
        let dag = store.dag();

        for node in dag.nodes() {
            for dep in node.depends_on() {
                prop_assert!(would_create_cycle(dag, node.task_id(), dep));
            }
        }
    }

    #[test]
    fn parallel_groups_partition_open_tasks(spec in dag_spec_strategy(16)) {
        let store = build_store(&spec);
        let dag = store.dag();
        let groups = find_parallel_groups(dag).unwrap();

        let mut seen = HashSet::new();
        let mut wave_of: HashMap<&str, usize> = HashMap::new();
        for (wave, group) in groups.iter().enumerate() {
            prop_assert!(!group.is_empty());
            for id in group {
                prop_assert!(seen.insert(id.as_str()), "{} placed twice", id);
                wave_of.insert(id.as_str(), wave);
            }
            for id in group {
                for dep in dag.dependencies_of(id) {
                    prop_assert!(!group.contains(dep), "{} and {} share a wave", id, dep);
                }
            }
        }

        let open: HashSet<&str> = dag
            .nodes()
            .filter(|n| !n.status().is_completed())
            .map(|n| n.task_id())
            .collect();
        prop_assert_eq!(&seen, &open);

        // Every open dependency sits in an earlier wave.
        for (id, wave) in &wave_of {
            for dep in dag.dependencies_of(id) {
                if let Some(dep_wave) = wave_of.get(dep.as_str()) {
                    prop_assert!(dep_wave < wave);
                }
            }
        }
    }

    #[test]
    fn critical_path_matches_stats_and_oracle(spec in dag_spec_strategy(16)) {
        let store = build_store(&spec);
        let dag = store.dag();
        let path = find_critical_path(dag).unwrap();
        let stats = compute_dag_stats(dag).unwrap();

        prop_assert_eq!(path.len(), stats.max_depth);
        prop_assert!(path.len() <= dag.len());
        prop_assert_eq!(path.len(), oracle_longest_chain(dag));
        for pair in path.tasks.windows(2) {
            prop_assert!(dag.has_edge(&pair[0], &pair[1]));
        }
    }

    #[test]
    fn stats_are_exact(spec in dag_spec_strategy(16)) {
        let store = build_store(&spec);
        let dag = store.dag();
        let stats = compute_dag_stats(dag).unwrap();

        prop_assert_eq!(stats.node_count, dag.len());
        prop_assert_eq!(stats.edge_count, dag.edges().count());
        prop_assert_eq!(stats.edge_count, spec.deps.iter().map(Vec::len).sum::<usize>());
        prop_assert_eq!(
            stats.ready_task_count + stats.blocked_task_count + stats.completed_task_count,
            stats.node_count
        );
        prop_assert!(stats.average_in_degree >= 0.0);
        prop_assert!(stats.average_out_degree >= 0.0);
        prop_assert!(
            stats.in_progress_task_count + stats.failed_task_count <= stats.blocked_task_count
        );
    }

    #[test]
    fn status_changes_keep_readiness_in_sync(
        spec in dag_spec_strategy(12),
        changes in proptest::collection::vec((0..12usize, status_strategy()), 0..30),
    ) {
        let mut store = build_store(&spec);
        let n = spec.len();

        for (index, status) in changes {
            let id = task_name(n, index % n);
            let change = store.set_status(&id, status).unwrap();

            for ready in &change.newly_ready {
                prop_assert!(store.dag().node(ready).unwrap().is_ready());
            }
            for blocked in &change.newly_blocked {
                let node = store.dag().node(blocked).unwrap();
                prop_assert!(!node.is_ready());
                prop_assert!(!node.status().is_completed());
            }

            let dag = store.dag();
            for node in dag.nodes() {
                let blocking = get_blocking_tasks(dag, node.task_id()).unwrap();
                for b in &blocking {
                    prop_assert!(node.depends_on().contains(b));
                    prop_assert!(!dag.status_of(b).unwrap().is_completed());
                }
            }
            if let Err(violation) = check_invariants(dag) {
                prop_assert!(false, "{}", violation);
            }
        }
    }
}
