// src/dag/stats.rs

use serde::Serialize;

use crate::dag::critical_path::find_critical_path;
use crate::dag::graph::TaskDag;
use crate::dag::scheduler::topological_sort;
use crate::errors::DagError;
use crate::types::TaskStatus;

/// Aggregate health metrics for one graph, for telemetry consumers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DagStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub ready_task_count: usize,
    pub blocked_task_count: usize,
    pub completed_task_count: usize,
    /// Subset of `blocked_task_count`.
    pub in_progress_task_count: usize,
    /// Subset of `blocked_task_count`.
    pub failed_task_count: usize,
    /// Tasks without dependencies.
    pub root_count: usize,
    pub average_in_degree: f64,
    pub average_out_degree: f64,
    /// Length of the critical path.
    pub max_depth: usize,
    pub version: u64,
}

pub fn compute_dag_stats(dag: &TaskDag) -> Result<DagStats, DagError> {
    let schedule = topological_sort(dag)?;
    let critical_path = find_critical_path(dag)?;

    let node_count = dag.len();
    let (mut in_total, mut out_total) = (0usize, 0usize);
    let (mut in_progress, mut failed, mut roots) = (0usize, 0usize, 0usize);

    for node in dag.nodes() {
        in_total += node.in_degree();
        out_total += node.out_degree();
        if node.in_degree() == 0 {
            roots += 1;
        }
        match node.status() {
            TaskStatus::InProgress => in_progress += 1,
            TaskStatus::Failed => failed += 1,
            TaskStatus::Pending | TaskStatus::Completed => {}
        }
    }

    let average = |total: usize| {
        if node_count == 0 {
            0.0
        } else {
            total as f64 / node_count as f64
        }
    };

    Ok(DagStats {
        node_count,
        edge_count: dag.edge_count(),
        ready_task_count: schedule.ready_tasks.len(),
        blocked_task_count: schedule.blocked_tasks.len(),
        completed_task_count: schedule.completed_tasks.len(),
        in_progress_task_count: in_progress,
        failed_task_count: failed,
        root_count: roots,
        average_in_degree: average(in_total),
        average_out_degree: average(out_total),
        max_depth: critical_path.len(),
        version: dag.version(),
    })
}
