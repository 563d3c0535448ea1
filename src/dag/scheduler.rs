// src/dag/scheduler.rs

use std::collections::{BTreeMap, VecDeque};

use serde::Serialize;
use tracing::error;

use crate::dag::graph::{TaskDag, TaskDagNode};
use crate::dag::readiness::blocking_of;
use crate::errors::DagError;
use crate::types::{TaskId, TaskStatus};

/// Linear order of every task plus the ready / blocked / completed partition.
///
/// The three partition lists follow `order`, are pairwise disjoint and
/// together cover every node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopologicalSchedule {
    pub order: Vec<TaskId>,
    /// Pending tasks whose dependencies are all completed.
    pub ready_tasks: Vec<TaskId>,
    /// Every other non-completed task: pending with an open dependency, or
    /// already in progress / failed.
    pub blocked_tasks: Vec<TaskId>,
    pub completed_tasks: Vec<TaskId>,
}

/// Kahn-style frontier over a subset of the graph.
///
/// Members count only predecessors that are themselves members; a member
/// joins the queue once all of them have been released.
pub(super) struct Frontier<'a> {
    dag: &'a TaskDag,
    remaining: BTreeMap<&'a str, usize>,
    queue: VecDeque<&'a str>,
}

impl<'a> Frontier<'a> {
    pub(super) fn new(dag: &'a TaskDag, is_member: impl Fn(&TaskDagNode) -> bool) -> Self {
        let remaining: BTreeMap<&'a str, usize> = dag
            .nodes()
            .filter(|node| is_member(*node))
            .map(|node| {
                let open = node
                    .depends_on()
                    .iter()
                    .filter(|dep| dag.node(dep).is_some_and(&is_member))
                    .count();
                (node.task_id(), open)
            })
            .collect();

        let queue = remaining
            .iter()
            .filter(|(_, open)| **open == 0)
            .map(|(id, _)| *id)
            .collect();

        Self {
            dag,
            remaining,
            queue,
        }
    }

    /// Pop one task and release its dependents.
    pub(super) fn pop(&mut self) -> Option<&'a str> {
        let id = self.queue.pop_front()?;
        self.settle(id);
        self.release(id);
        Some(id)
    }

    /// Take everything currently on the frontier as one layer, then release
    /// the dependents of the whole layer.
    pub(super) fn take_layer(&mut self) -> Vec<&'a str> {
        let layer: Vec<&'a str> = self.queue.drain(..).collect();
        for id in &layer {
            self.settle(id);
        }
        for id in &layer {
            self.release(id);
        }
        layer
    }

    /// Members that were never released: they are stuck behind a cycle.
    pub(super) fn stuck(&self) -> Vec<TaskId> {
        self.remaining
            .iter()
            .filter(|(_, open)| **open > 0)
            .map(|(id, _)| id.to_string())
            .collect()
    }

    fn settle(&mut self, id: &str) {
        self.remaining.remove(id);
    }

    fn release(&mut self, id: &str) {
        let dag = self.dag;
        for next in dag.dependents_of(id) {
            if let Some(open) = self.remaining.get_mut(next) {
                *open = open.saturating_sub(1);
                if *open == 0 {
                    self.queue.push_back(next);
                }
            }
        }
    }
}

/// Order every task so each dependency precedes its dependents.
///
/// Fails with [`DagError::Inconsistent`] if some tasks can never be released,
/// which only happens if the graph was corrupted.
pub(super) fn topological_order(dag: &TaskDag) -> Result<Vec<TaskId>, DagError> {
    let mut frontier = Frontier::new(dag, |_| true);
    let mut order = Vec::with_capacity(dag.len());

    while let Some(id) = frontier.pop() {
        order.push(id.to_string());
    }

    if order.len() != dag.len() {
        let cycle_task_ids = frontier.stuck();
        error!(
            channel = dag.channel_id(),
            version = dag.version(),
            stuck = ?cycle_task_ids,
            "topological sort found a cycle; graph invariants are broken"
        );
        return Err(DagError::Inconsistent { cycle_task_ids });
    }

    Ok(order)
}

/// Full topological schedule of the graph.
pub fn topological_sort(dag: &TaskDag) -> Result<TopologicalSchedule, DagError> {
    let order = topological_order(dag)?;

    let mut ready_tasks = Vec::new();
    let mut blocked_tasks = Vec::new();
    let mut completed_tasks = Vec::new();

    for id in &order {
        let Some(node) = dag.node(id) else {
            continue;
        };
        match node.status() {
            TaskStatus::Completed => completed_tasks.push(id.clone()),
            TaskStatus::Pending if blocking_of(dag, node.depends_on()).is_empty() => {
                ready_tasks.push(id.clone())
            }
            TaskStatus::Pending | TaskStatus::InProgress | TaskStatus::Failed => {
                blocked_tasks.push(id.clone())
            }
        }
    }

    Ok(TopologicalSchedule {
        order,
        ready_tasks,
        blocked_tasks,
        completed_tasks,
    })
}

/// Tasks that may be handed to an agent right now.
pub fn next_assignable_tasks(dag: &TaskDag) -> Result<Vec<TaskId>, DagError> {
    Ok(topological_sort(dag)?.ready_tasks)
}
