// src/dag/graph.rs

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::{TaskId, TaskStatus};

/// A single task in the dependency graph.
///
/// Every field is maintained by [`TaskDagStore`](crate::dag::TaskDagStore);
/// outside the `dag` module the node is read-only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskDagNode {
    pub(super) task_id: TaskId,
    pub(super) status: TaskStatus,
    /// Direct dependencies, in declaration order.
    pub(super) depends_on: Vec<TaskId>,
    /// Entries of `depends_on` that are not completed yet.
    pub(super) blocked_by: Vec<TaskId>,
    pub(super) in_degree: usize,
    pub(super) out_degree: usize,
    /// Cached: `status == Pending` and `blocked_by` is empty.
    pub(super) is_ready: bool,
    pub(super) added_at: DateTime<Utc>,
    pub(super) updated_at: DateTime<Utc>,
}

impl TaskDagNode {
    pub(super) fn new(task_id: TaskId, status: TaskStatus, now: DateTime<Utc>) -> Self {
        Self {
            task_id,
            status,
            depends_on: Vec::new(),
            blocked_by: Vec::new(),
            in_degree: 0,
            out_degree: 0,
            is_ready: status.is_pending(),
            added_at: now,
            updated_at: now,
        }
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn depends_on(&self) -> &[TaskId] {
        &self.depends_on
    }

    pub fn blocked_by(&self) -> &[TaskId] {
        &self.blocked_by
    }

    pub fn in_degree(&self) -> usize {
        self.in_degree
    }

    pub fn out_degree(&self) -> usize {
        self.out_degree
    }

    pub fn is_ready(&self) -> bool {
        self.is_ready
    }

    pub fn added_at(&self) -> DateTime<Utc> {
        self.added_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Directed dependency edge: `to` depends on `from`, so `from` must complete
/// before `to` may start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskDagEdge {
    pub(super) id: String,
    pub(super) from_task_id: TaskId,
    pub(super) to_task_id: TaskId,
}

impl TaskDagEdge {
    pub(super) fn new(from: &str, to: &str) -> Self {
        Self {
            id: Self::id_for(from, to),
            from_task_id: from.to_string(),
            to_task_id: to.to_string(),
        }
    }

    /// Deterministic edge id for a `(from, to)` pair.
    ///
    /// Plain ids render as `from->to`. A `\` or `>` inside either id is
    /// escaped with a backslash, so the only unescaped `>` is the separator's
    /// and distinct pairs never share an id.
    pub fn id_for(from: &str, to: &str) -> String {
        let mut id = String::with_capacity(from.len() + to.len() + 2);
        push_escaped(&mut id, from);
        id.push_str("->");
        push_escaped(&mut id, to);
        id
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn from_task_id(&self) -> &str {
        &self.from_task_id
    }

    pub fn to_task_id(&self) -> &str {
        &self.to_task_id
    }
}

fn push_escaped(out: &mut String, part: &str) {
    for c in part.chars() {
        if matches!(c, '\\' | '>') {
            out.push('\\');
        }
        out.push(c);
    }
}

/// In-memory task dependency graph for one channel / workspace.
///
/// Nodes, edges and both adjacency maps are keyed by ordered maps so every
/// traversal is deterministic. The graph is append-only: tasks and
/// dependencies are never removed.
#[derive(Debug, Clone)]
pub struct TaskDag {
    pub(super) channel_id: String,
    pub(super) nodes: BTreeMap<TaskId, TaskDagNode>,
    /// Keyed by `(from, to)`.
    pub(super) edges: BTreeMap<(TaskId, TaskId), TaskDagEdge>,
    /// `from -> {to}`: tasks that depend on the key.
    pub(super) adjacency: BTreeMap<TaskId, BTreeSet<TaskId>>,
    /// `to -> {from}`: tasks the key depends on.
    pub(super) reverse_adjacency: BTreeMap<TaskId, BTreeSet<TaskId>>,
    pub(super) created_at: DateTime<Utc>,
    pub(super) updated_at: DateTime<Utc>,
    /// Bumped on every committed mutation.
    pub(super) version: u64,
}

impl TaskDag {
    pub(super) fn new(channel_id: String) -> Self {
        let now = Utc::now();
        Self {
            channel_id,
            nodes: BTreeMap::new(),
            edges: BTreeMap::new(),
            adjacency: BTreeMap::new(),
            reverse_adjacency: BTreeMap::new(),
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Number of tasks.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains_task(&self, task_id: &str) -> bool {
        self.nodes.contains_key(task_id)
    }

    pub fn node(&self, task_id: &str) -> Option<&TaskDagNode> {
        self.nodes.get(task_id)
    }

    pub fn status_of(&self, task_id: &str) -> Option<TaskStatus> {
        self.nodes.get(task_id).map(|n| n.status)
    }

    /// All nodes, ordered by task id.
    pub fn nodes(&self) -> impl Iterator<Item = &TaskDagNode> {
        self.nodes.values()
    }

    /// All task ids, in order.
    pub fn task_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(|s| s.as_str())
    }

    /// All edges, ordered by `(from, to)`.
    pub fn edges(&self) -> impl Iterator<Item = &TaskDagEdge> {
        self.edges.values()
    }

    pub fn edge(&self, from: &str, to: &str) -> Option<&TaskDagEdge> {
        self.edges.get(&(from.to_string(), to.to_string()))
    }

    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.edge(from, to).is_some()
    }

    /// Immediate dependencies of a task, in declaration order.
    pub fn dependencies_of(&self, task_id: &str) -> &[TaskId] {
        self.nodes
            .get(task_id)
            .map(|n| n.depends_on.as_slice())
            .unwrap_or(&[])
    }

    /// Immediate dependents of a task (tasks that list this one in their
    /// `depends_on`).
    pub fn dependents_of(&self, task_id: &str) -> impl Iterator<Item = &str> {
        self.adjacency
            .get(task_id)
            .into_iter()
            .flat_map(|set| set.iter().map(|s| s.as_str()))
    }

    /// Tasks the given one depends on, as recorded in the reverse adjacency.
    pub fn predecessors_of(&self, task_id: &str) -> impl Iterator<Item = &str> {
        self.reverse_adjacency
            .get(task_id)
            .into_iter()
            .flat_map(|set| set.iter().map(|s| s.as_str()))
    }
}
