// src/dag/readiness.rs

//! Readiness and blocking queries for single tasks.
//!
//! These read live statuses rather than the cached `is_ready` / `blocked_by`
//! fields, so they double as a cross-check of what the store maintains.

use crate::dag::graph::TaskDag;
use crate::types::{TaskId, TaskStatus};

/// `true` iff the task is pending and every dependency is completed.
///
/// Returns `None` if the task is unknown. O(|depends_on|).
pub fn is_task_ready(dag: &TaskDag, task_id: &str) -> Option<bool> {
    let node = dag.node(task_id)?;
    Some(node.status().is_pending() && blocking_of(dag, node.depends_on()).is_empty())
}

/// Dependencies of the task that are not completed yet.
///
/// Always a subset of `depends_on`, in the same order. Returns `None` if the
/// task is unknown.
pub fn get_blocking_tasks(dag: &TaskDag, task_id: &str) -> Option<Vec<TaskId>> {
    let node = dag.node(task_id)?;
    Some(blocking_of(dag, node.depends_on()))
}

/// Filter a dependency list down to the entries that are not completed.
pub(super) fn blocking_of(dag: &TaskDag, depends_on: &[TaskId]) -> Vec<TaskId> {
    depends_on
        .iter()
        .filter(|dep| dag.status_of(dep) != Some(TaskStatus::Completed))
        .cloned()
        .collect()
}
