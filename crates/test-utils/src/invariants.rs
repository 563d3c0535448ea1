use std::collections::HashSet;

use taskdag::dag::{TaskDag, TaskDagEdge, get_blocking_tasks, is_task_ready, topological_sort};

/// Check every structural invariant the store promises to keep.
///
/// Returns a description of the first violation found, so it can be used
/// from both plain tests and `prop_assert!`.
pub fn check_invariants(dag: &TaskDag) -> Result<(), String> {
    // Edge consistency.
    let mut edge_ids = HashSet::new();
    for edge in dag.edges() {
        let (from, to) = (edge.from_task_id(), edge.to_task_id());
        if !dag.contains_task(from) || !dag.contains_task(to) {
            return Err(format!("edge {} has a dangling endpoint", edge.id()));
        }
        if edge.id() != TaskDagEdge::id_for(from, to) || !edge_ids.insert(edge.id()) {
            return Err(format!("edge id {} is not unique to its pair", edge.id()));
        }
        if !dag.dependents_of(from).any(|t| t == to) {
            return Err(format!("{to} missing from adjacency of {from}"));
        }
        if !dag.predecessors_of(to).any(|f| f == from) {
            return Err(format!("{from} missing from reverse adjacency of {to}"));
        }
        if !dag.dependencies_of(to).iter().any(|d| d == from) {
            return Err(format!("{from} missing from depends_on of {to}"));
        }
    }

    for node in dag.nodes() {
        let id = node.task_id();

        // Degree consistency.
        if node.in_degree() != dag.predecessors_of(id).count() {
            return Err(format!("in_degree of {id} is stale"));
        }
        if node.out_degree() != dag.dependents_of(id).count() {
            return Err(format!("out_degree of {id} is stale"));
        }
        if node.depends_on().len() != node.in_degree() {
            return Err(format!("depends_on of {id} disagrees with in_degree"));
        }

        // Readiness cache agrees with live statuses.
        let live_ready = is_task_ready(dag, id).unwrap_or(false);
        if node.is_ready() != live_ready {
            return Err(format!("is_ready of {id} is stale"));
        }

        // Blocking subset.
        let blocking = get_blocking_tasks(dag, id).unwrap_or_default();
        if blocking.as_slice() != node.blocked_by() {
            return Err(format!("blocked_by of {id} is stale"));
        }
        for b in &blocking {
            if !node.depends_on().contains(b) {
                return Err(format!("{b} blocks {id} but is not a dependency"));
            }
            if dag.status_of(b).is_some_and(|s| s.is_completed()) {
                return Err(format!("completed task {b} still blocks {id}"));
            }
        }
    }

    let declared: usize = dag.nodes().map(|n| n.depends_on().len()).sum();
    if declared != dag.edge_count() {
        return Err(format!(
            "{} edges stored but {declared} dependencies declared",
            dag.edge_count()
        ));
    }

    // Partition completeness.
    let schedule = topological_sort(dag).map_err(|e| e.to_string())?;
    let mut seen = HashSet::new();
    for id in schedule
        .ready_tasks
        .iter()
        .chain(&schedule.blocked_tasks)
        .chain(&schedule.completed_tasks)
    {
        if !seen.insert(id.as_str()) {
            return Err(format!("{id} appears in more than one partition"));
        }
    }
    if seen.len() != dag.len() {
        return Err(format!(
            "partition covers {} of {} tasks",
            seen.len(),
            dag.len()
        ));
    }

    Ok(())
}
