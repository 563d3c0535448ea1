// src/dag/parallelism.rs

use tracing::error;

use crate::dag::graph::TaskDag;
use crate::dag::scheduler::Frontier;
use crate::errors::DagError;
use crate::types::TaskId;

/// Split every non-completed task into ordered execution waves.
///
/// Wave `n` holds the tasks whose non-completed dependencies all sit in
/// waves `0..n`, so no two members of a wave depend on each other and
/// finishing a wave can only unblock later ones. Completed tasks never
/// appear; in-progress and failed tasks do, since their dependents still
/// wait on them.
pub fn find_parallel_groups(dag: &TaskDag) -> Result<Vec<Vec<TaskId>>, DagError> {
    let mut frontier = Frontier::new(dag, |node| !node.status().is_completed());
    let mut groups = Vec::new();

    loop {
        let layer = frontier.take_layer();
        if layer.is_empty() {
            break;
        }
        groups.push(layer.into_iter().map(str::to_string).collect());
    }

    let stuck = frontier.stuck();
    if !stuck.is_empty() {
        error!(
            channel = dag.channel_id(),
            version = dag.version(),
            stuck = ?stuck,
            "parallel grouping found a cycle; graph invariants are broken"
        );
        return Err(DagError::Inconsistent {
            cycle_task_ids: stuck,
        });
    }

    Ok(groups)
}

/// Widest wave of the current execution plan: how many agents could be kept
/// busy at once at best.
pub fn max_parallelism(dag: &TaskDag) -> Result<usize, DagError> {
    Ok(find_parallel_groups(dag)?
        .iter()
        .map(Vec::len)
        .max()
        .unwrap_or(0))
}
