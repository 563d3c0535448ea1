// tests/property/strategies.rs

use std::collections::BTreeSet;

use proptest::prelude::*;
use taskdag::dag::TaskDagStore;
use taskdag::types::TaskStatus;

/// Shape of a generated DAG: per task, the indices it depends on, plus the
/// status to push once all edges exist.
#[derive(Debug, Clone)]
pub struct DagSpec {
    pub deps: Vec<Vec<usize>>,
    pub statuses: Vec<TaskStatus>,
}

impl DagSpec {
    pub fn len(&self) -> usize {
        self.deps.len()
    }
}

/// Task names run in the opposite direction to the dependencies, so id order
/// is never accidentally a valid topological order.
pub fn task_name(len: usize, index: usize) -> String {
    format!("task_{:03}", len - 1 - index)
}

pub fn status_strategy() -> impl Strategy<Value = TaskStatus> {
    prop_oneof![
        Just(TaskStatus::Pending),
        Just(TaskStatus::InProgress),
        Just(TaskStatus::Completed),
        Just(TaskStatus::Failed),
    ]
}

// We ensure acyclicity by only allowing task N to depend on tasks 0..N-1.
pub fn dag_spec_strategy(max_tasks: usize) -> impl Strategy<Value = DagSpec> {
    (1..=max_tasks)
        .prop_flat_map(|num_tasks| {
            (
                proptest::collection::vec(
                    proptest::collection::vec(any::<usize>(), 0..4),
                    num_tasks,
                ),
                proptest::collection::vec(status_strategy(), num_tasks),
            )
        })
        .prop_map(|(raw_deps, statuses)| {
            let deps = raw_deps
                .into_iter()
                .enumerate()
                .map(|(i, potential)| {
                    let mut valid = BTreeSet::new();
                    if i > 0 {
                        for dep in potential {
                            valid.insert(dep % i);
                        }
                    }
                    valid.into_iter().collect()
                })
                .collect();
            DagSpec { deps, statuses }
        })
}

/// Replay a generated shape through the public store API.
pub fn build_store(spec: &DagSpec) -> TaskDagStore {
    let n = spec.len();
    let mut store = TaskDagStore::new("prop");

    for i in 0..n {
        store.add_task(task_name(n, i)).unwrap();
    }
    for (i, deps) in spec.deps.iter().enumerate() {
        for &dep in deps {
            store
                .add_dependency(&task_name(n, dep), &task_name(n, i))
                .unwrap();
        }
    }
    for (i, status) in spec.statuses.iter().enumerate() {
        store.set_status(&task_name(n, i), *status).unwrap();
    }

    store
}
