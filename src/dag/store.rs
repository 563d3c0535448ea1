// src/dag/store.rs

//! The only place that mutates a [`TaskDag`].
//!
//! Every call either commits a change that keeps edges, both adjacency maps,
//! degree counters, `depends_on` / `blocked_by` and the `is_ready` cache in
//! agreement, or returns an error without touching anything.

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::DagLimits;
use crate::dag::graph::{TaskDag, TaskDagEdge, TaskDagNode};
use crate::dag::readiness::blocking_of;
use crate::dag::validator::{dependency_path, would_create_cycle};
use crate::errors::DagError;
use crate::types::{TaskId, TaskStatus};

/// Structured result of [`TaskDagStore::set_status`].
///
/// `newly_ready` / `newly_blocked` list the tasks whose cached readiness
/// flipped as a consequence of this call (the task itself or its direct
/// dependents). A task that stops being ready because it was just completed
/// is in neither list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusChange {
    pub task_id: TaskId,
    pub previous: TaskStatus,
    pub current: TaskStatus,
    pub newly_ready: Vec<TaskId>,
    pub newly_blocked: Vec<TaskId>,
    /// Graph version after the call.
    pub version: u64,
}

impl StatusChange {
    /// Whether the call changed anything at all.
    pub fn is_noop(&self) -> bool {
        self.previous == self.current
    }
}

/// Owner of one channel's task graph.
#[derive(Debug, Clone)]
pub struct TaskDagStore {
    dag: TaskDag,
    limits: DagLimits,
}

impl TaskDagStore {
    /// Empty graph for a channel, with no size limits.
    pub fn new(channel_id: impl Into<String>) -> Self {
        Self::with_limits(channel_id, DagLimits::default())
    }

    pub fn with_limits(channel_id: impl Into<String>, limits: DagLimits) -> Self {
        Self {
            dag: TaskDag::new(channel_id.into()),
            limits,
        }
    }

    /// Read-only view for the query algorithms.
    pub fn dag(&self) -> &TaskDag {
        &self.dag
    }

    pub fn limits(&self) -> DagLimits {
        self.limits
    }

    /// Whether one more task would go past `max_nodes`.
    ///
    /// The store never refuses a mutation because of limits; callers decide.
    pub fn would_exceed_task_limit(&self) -> bool {
        self.limits
            .max_nodes
            .is_some_and(|max| self.dag.len() >= max)
    }

    /// Whether one more dependency would go past `max_edges`.
    pub fn would_exceed_edge_limit(&self) -> bool {
        self.limits
            .max_edges
            .is_some_and(|max| self.dag.edge_count() >= max)
    }

    /// Add a pending task.
    pub fn add_task(&mut self, task_id: impl Into<TaskId>) -> Result<(), DagError> {
        self.add_task_with_status(task_id, TaskStatus::Pending)
    }

    /// Add a task with an explicit initial status.
    pub fn add_task_with_status(
        &mut self,
        task_id: impl Into<TaskId>,
        status: TaskStatus,
    ) -> Result<(), DagError> {
        let task_id = task_id.into();
        if self.dag.nodes.contains_key(&task_id) {
            warn!(task = %task_id, "rejecting duplicate task");
            return Err(DagError::DuplicateTask(task_id));
        }

        let now = Utc::now();
        self.dag.adjacency.insert(task_id.clone(), Default::default());
        self.dag
            .reverse_adjacency
            .insert(task_id.clone(), Default::default());
        self.dag
            .nodes
            .insert(task_id.clone(), TaskDagNode::new(task_id.clone(), status, now));
        self.bump();

        debug!(
            task = %task_id,
            %status,
            version = self.dag.version,
            "task added"
        );
        Ok(())
    }

    /// Declare that `to` depends on `from`.
    ///
    /// Checks run in a fixed order: unknown ids, self-dependency, duplicate
    /// edge, then the cycle probe.
    pub fn add_dependency(&mut self, from: &str, to: &str) -> Result<(), DagError> {
        for id in [from, to] {
            if !self.dag.contains_task(id) {
                warn!(from, to, unknown = id, "rejecting dependency on unknown task");
                return Err(DagError::UnknownTask(id.to_string()));
            }
        }

        if from == to {
            warn!(task = from, "rejecting self-dependency");
            return Err(DagError::SelfDependency(from.to_string()));
        }

        if self.dag.has_edge(from, to) {
            warn!(from, to, "rejecting duplicate dependency");
            return Err(DagError::DuplicateEdge {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        if would_create_cycle(&self.dag, from, to) {
            warn!(
                from,
                to,
                existing_path = ?dependency_path(&self.dag, to, from),
                "rejecting dependency that would create a cycle"
            );
            return Err(DagError::Cycle {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        self.commit_edge(from, to);
        Ok(())
    }

    /// Push a status transition for a task.
    ///
    /// Readiness is recomputed for the task itself and, when the task crosses
    /// the completed boundary in either direction, for its direct dependents
    /// only. Re-setting the current status is a no-op and keeps the version.
    pub fn set_status(
        &mut self,
        task_id: &str,
        status: TaskStatus,
    ) -> Result<StatusChange, DagError> {
        let previous = match self.dag.nodes.get(task_id) {
            Some(node) => node.status,
            None => {
                warn!(task = task_id, %status, "status change for unknown task");
                return Err(DagError::UnknownTask(task_id.to_string()));
            }
        };

        let mut change = StatusChange {
            task_id: task_id.to_string(),
            previous,
            current: status,
            newly_ready: Vec::new(),
            newly_blocked: Vec::new(),
            version: self.dag.version,
        };

        if previous == status {
            debug!(task = task_id, %status, "status unchanged; nothing to do");
            return Ok(change);
        }

        let now = Utc::now();
        if let Some(node) = self.dag.nodes.get_mut(task_id) {
            node.status = status;
            node.updated_at = now;
        }

        let mut affected: Vec<TaskId> = vec![task_id.to_string()];
        if previous.is_completed() != status.is_completed() {
            affected.extend(self.dag.dependents_of(task_id).map(str::to_string));
        }

        for id in &affected {
            if let Some((was_ready, is_ready)) = self.refresh_readiness(id) {
                if !was_ready && is_ready {
                    change.newly_ready.push(id.clone());
                } else if was_ready && !is_ready && !self.is_completed(id) {
                    change.newly_blocked.push(id.clone());
                }
            }
        }

        self.bump();
        change.version = self.dag.version;

        debug!(
            task = task_id,
            %previous,
            current = %status,
            version = self.dag.version,
            "status updated"
        );
        if !change.newly_ready.is_empty() {
            info!(
                task = task_id,
                newly_ready = ?change.newly_ready,
                "status change made tasks ready"
            );
        }

        Ok(change)
    }

    /// Commit an edge without the self/duplicate/cycle checks.
    ///
    /// Exists so tests can corrupt a graph on purpose and observe how the
    /// read-only algorithms report it. Unknown ids are still refused.
    #[cfg(feature = "test-support")]
    pub fn insert_edge_unchecked(&mut self, from: &str, to: &str) -> Result<(), DagError> {
        for id in [from, to] {
            if !self.dag.contains_task(id) {
                return Err(DagError::UnknownTask(id.to_string()));
            }
        }
        warn!(from, to, "inserting edge without validation");
        self.commit_edge(from, to);
        Ok(())
    }

    fn commit_edge(&mut self, from: &str, to: &str) {
        let edge = TaskDagEdge::new(from, to);
        let edge_id = edge.id.clone();
        self.dag
            .edges
            .insert((from.to_string(), to.to_string()), edge);

        self.dag
            .adjacency
            .entry(from.to_string())
            .or_default()
            .insert(to.to_string());
        self.dag
            .reverse_adjacency
            .entry(to.to_string())
            .or_default()
            .insert(from.to_string());

        let now = Utc::now();
        if let Some(node) = self.dag.nodes.get_mut(from) {
            node.out_degree += 1;
            node.updated_at = now;
        }
        if let Some(node) = self.dag.nodes.get_mut(to) {
            node.in_degree += 1;
            node.depends_on.push(from.to_string());
            node.updated_at = now;
        }

        self.refresh_readiness(to);
        self.bump();

        debug!(
            edge = %edge_id,
            version = self.dag.version,
            "dependency added"
        );
    }

    /// Recompute `blocked_by` and `is_ready` for one node.
    ///
    /// Returns `(was_ready, is_ready)`, or `None` for an unknown id.
    fn refresh_readiness(&mut self, task_id: &str) -> Option<(bool, bool)> {
        let node = self.dag.nodes.get(task_id)?;
        let blocked_by = blocking_of(&self.dag, &node.depends_on);
        let is_ready = node.status.is_pending() && blocked_by.is_empty();

        let node = self.dag.nodes.get_mut(task_id)?;
        let was_ready = node.is_ready;
        node.blocked_by = blocked_by;
        node.is_ready = is_ready;
        Some((was_ready, is_ready))
    }

    fn is_completed(&self, task_id: &str) -> bool {
        self.dag
            .status_of(task_id)
            .is_some_and(|status| status.is_completed())
    }

    fn bump(&mut self) {
        self.dag.version += 1;
        self.dag.updated_at = Utc::now();
    }
}
