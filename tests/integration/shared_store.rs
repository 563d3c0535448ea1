// tests/integration/shared_store.rs

use std::thread;

use crate::common::assert_invariants;
use crate::common::builders::diamond;
use taskdag::dag::{SharedTaskDagStore, TaskDagStore};
use taskdag::errors::DagError;
use taskdag::types::TaskStatus;

#[test]
fn snapshot_detects_later_mutations() {
    let shared = SharedTaskDagStore::new(diamond().build());

    let snapshot = shared.snapshot();
    assert!(shared.is_current(&snapshot));
    assert_eq!(snapshot.version(), shared.version());

    shared.set_status("A", TaskStatus::Completed).unwrap();

    assert!(!shared.is_current(&snapshot));
    // The snapshot keeps answering for the graph it was taken from.
    assert_eq!(snapshot.next_assignable_tasks().unwrap(), vec!["A"]);
    assert_eq!(shared.next_assignable_tasks().unwrap(), vec!["B", "C"]);
}

#[test]
fn rejected_mutations_keep_snapshot_current() {
    let shared = SharedTaskDagStore::new(diamond().build());
    let snapshot = shared.snapshot();

    assert!(matches!(
        shared.add_dependency("D", "A"),
        Err(DagError::Cycle { .. })
    ));
    assert!(matches!(
        shared.add_task("A"),
        Err(DagError::DuplicateTask(_))
    ));

    assert!(shared.is_current(&snapshot));
}

#[test]
fn orchestrator_queries_through_shared_handle() {
    let shared = SharedTaskDagStore::new(diamond().build());

    assert_eq!(shared.is_task_ready("A"), Some(true));
    assert_eq!(shared.get_blocking_tasks("D"), Some(vec!["B".to_string(), "C".to_string()]));
    assert_eq!(shared.execution_plan().unwrap().len(), 3);
    assert_eq!(shared.bottleneck().unwrap().len(), 3);

    let health = shared.health().unwrap();
    assert_eq!(health.node_count, 4);
    assert_eq!(health.max_depth, 3);
}

#[test]
fn concurrent_writers_are_serialised() {
    let shared = SharedTaskDagStore::new(TaskDagStore::new("busy-room"));
    shared.add_task("root").unwrap();

    thread::scope(|scope| {
        for worker in 0..8 {
            let shared = shared.clone();
            scope.spawn(move || {
                for i in 0..25 {
                    let id = format!("w{worker}-t{i}");
                    shared.add_task(id.clone()).unwrap();
                    shared.add_dependency("root", &id).unwrap();
                    // Readers interleave with writers.
                    let _ = shared.read(|dag| dag.len());
                }
            });
        }
        for _ in 0..4 {
            let shared = shared.clone();
            scope.spawn(move || {
                for _ in 0..25 {
                    let snapshot = shared.snapshot();
                    assert!(snapshot.schedule().is_ok());
                }
            });
        }
    });

    let total = 1 + 8 * 25;
    shared.read(|dag| {
        assert_eq!(dag.len(), total);
        assert_eq!(dag.edge_count(), total - 1);
        assert_eq!(dag.node("root").unwrap().out_degree(), total - 1);
        assert_invariants(dag);
    });

    let change = shared.set_status("root", TaskStatus::Completed).unwrap();
    assert_eq!(change.newly_ready.len(), total - 1);
}

#[test]
fn mutate_runs_compound_changes_atomically() {
    let shared = SharedTaskDagStore::new(TaskDagStore::new("room"));

    let result: Result<(), DagError> = shared.mutate(|store| {
        store.add_task("A")?;
        store.add_task("B")?;
        store.add_dependency("A", "B")
    });
    result.unwrap();

    assert_eq!(shared.read(|dag| dag.edge_count()), 1);
    assert_eq!(shared.next_assignable_tasks().unwrap(), vec!["A"]);
}
