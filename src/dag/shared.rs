// src/dag/shared.rs

//! Thread-safe handle around one channel's [`TaskDagStore`].
//!
//! Writers are serialised by a `parking_lot::RwLock`; readers share it.
//! Long O(V + E) queries run on a detached [`DagSnapshot`] so they never hold
//! the lock, and the snapshot's version tells the caller whether the graph
//! moved on in the meantime.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::dag::critical_path::{CriticalPath, find_critical_path};
use crate::dag::graph::TaskDag;
use crate::dag::parallelism::find_parallel_groups;
use crate::dag::readiness::{get_blocking_tasks, is_task_ready};
use crate::dag::scheduler::{TopologicalSchedule, next_assignable_tasks, topological_sort};
use crate::dag::stats::{DagStats, compute_dag_stats};
use crate::dag::store::{StatusChange, TaskDagStore};
use crate::errors::DagError;
use crate::types::{TaskId, TaskStatus};

#[derive(Debug, Clone)]
pub struct SharedTaskDagStore {
    inner: Arc<RwLock<TaskDagStore>>,
}

impl SharedTaskDagStore {
    pub fn new(store: TaskDagStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// Run `f` with exclusive access. One mutation is in flight at a time.
    pub fn mutate<R>(&self, f: impl FnOnce(&mut TaskDagStore) -> R) -> R {
        let mut guard = self.inner.write();
        f(&mut *guard)
    }

    /// Run `f` with shared access. Readers may run concurrently.
    pub fn read<R>(&self, f: impl FnOnce(&TaskDag) -> R) -> R {
        let guard = self.inner.read();
        f(guard.dag())
    }

    pub fn version(&self) -> u64 {
        self.inner.read().dag().version()
    }

    /// Detached copy of the graph as of now.
    pub fn snapshot(&self) -> DagSnapshot {
        let guard = self.inner.read();
        let dag = guard.dag().clone();
        debug!(
            channel = dag.channel_id(),
            version = dag.version(),
            "snapshot taken"
        );
        DagSnapshot {
            version: dag.version(),
            dag,
        }
    }

    /// Whether nothing was committed since `snapshot` was taken.
    pub fn is_current(&self, snapshot: &DagSnapshot) -> bool {
        self.version() == snapshot.version
    }

    pub fn add_task(&self, task_id: impl Into<TaskId>) -> Result<(), DagError> {
        self.mutate(|store| store.add_task(task_id))
    }

    pub fn add_dependency(&self, from: &str, to: &str) -> Result<(), DagError> {
        self.mutate(|store| store.add_dependency(from, to))
    }

    pub fn set_status(&self, task_id: &str, status: TaskStatus) -> Result<StatusChange, DagError> {
        self.mutate(|store| store.set_status(task_id, status))
    }

    pub fn is_task_ready(&self, task_id: &str) -> Option<bool> {
        self.read(|dag| is_task_ready(dag, task_id))
    }

    pub fn get_blocking_tasks(&self, task_id: &str) -> Option<Vec<TaskId>> {
        self.read(|dag| get_blocking_tasks(dag, task_id))
    }

    /// Ready tasks, computed on a fresh snapshot.
    pub fn next_assignable_tasks(&self) -> Result<Vec<TaskId>, DagError> {
        self.snapshot().next_assignable_tasks()
    }

    /// Execution waves, computed on a fresh snapshot.
    pub fn execution_plan(&self) -> Result<Vec<Vec<TaskId>>, DagError> {
        self.snapshot().execution_plan()
    }

    /// Critical path, computed on a fresh snapshot.
    pub fn bottleneck(&self) -> Result<CriticalPath, DagError> {
        self.snapshot().bottleneck()
    }

    /// Aggregate stats, computed on a fresh snapshot.
    pub fn health(&self) -> Result<DagStats, DagError> {
        self.snapshot().health()
    }
}

/// Versioned copy of a graph, safe to query without any lock.
#[derive(Debug, Clone)]
pub struct DagSnapshot {
    version: u64,
    dag: TaskDag,
}

impl DagSnapshot {
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn dag(&self) -> &TaskDag {
        &self.dag
    }

    pub fn schedule(&self) -> Result<TopologicalSchedule, DagError> {
        topological_sort(&self.dag)
    }

    pub fn next_assignable_tasks(&self) -> Result<Vec<TaskId>, DagError> {
        next_assignable_tasks(&self.dag)
    }

    pub fn execution_plan(&self) -> Result<Vec<Vec<TaskId>>, DagError> {
        find_parallel_groups(&self.dag)
    }

    pub fn bottleneck(&self) -> Result<CriticalPath, DagError> {
        find_critical_path(&self.dag)
    }

    pub fn health(&self) -> Result<DagStats, DagError> {
        compute_dag_stats(&self.dag)
    }
}
