// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::debug;

use crate::dag::TaskDagStore;
use crate::errors::Result;
use crate::types::TaskStatus;

/// Raw plan file as deserialized from TOML (before validation).
///
/// ```toml
/// [dag]
/// channel_id = "build-room"
///
/// [limits]
/// max_nodes = 1000
///
/// [task.lint]
///
/// [task.test]
/// after = ["lint"]
/// status = "in_progress"
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPlanFile {
    #[serde(default)]
    pub dag: DagSection,

    #[serde(default)]
    pub limits: DagLimits,

    /// All tasks from `[task.<id>]`, keyed by task id.
    #[serde(default)]
    pub task: BTreeMap<String, TaskSpec>,
}

/// Validated plan file.
///
/// This type can only be constructed via `TryFrom<RawPlanFile>`, which
/// guarantees that every `after` reference exists and the limits are met.
#[derive(Debug, Clone)]
pub struct PlanFile {
    pub dag: DagSection,
    pub limits: DagLimits,
    pub task: BTreeMap<String, TaskSpec>,
}

impl PlanFile {
    pub(crate) fn new_unchecked(
        dag: DagSection,
        limits: DagLimits,
        task: BTreeMap<String, TaskSpec>,
    ) -> Self {
        Self { dag, limits, task }
    }

    /// Number of dependencies declared across all tasks.
    pub fn dependency_count(&self) -> usize {
        self.task.values().map(|t| t.after.len()).sum()
    }

    /// Replay the plan into a fresh store.
    ///
    /// Tasks are created first (pending), then dependencies in task order,
    /// then non-pending statuses are pushed through `set_status`, so the
    /// store's own checks (including cycle rejection) apply.
    pub fn build_store(&self) -> Result<TaskDagStore> {
        let mut store = TaskDagStore::with_limits(self.dag.channel_id.clone(), self.limits);

        for id in self.task.keys() {
            store.add_task(id.clone())?;
        }

        for (id, spec) in self.task.iter() {
            for dep in spec.after.iter() {
                store.add_dependency(dep, id)?;
            }
        }

        for (id, spec) in self.task.iter() {
            if spec.status != TaskStatus::Pending {
                store.set_status(id, spec.status)?;
            }
        }

        debug!(
            channel = %self.dag.channel_id,
            tasks = store.dag().len(),
            dependencies = store.dag().edge_count(),
            "plan loaded into store"
        );
        Ok(store)
    }
}

/// `[dag]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct DagSection {
    #[serde(default = "default_channel_id")]
    pub channel_id: String,
}

fn default_channel_id() -> String {
    "default".to_string()
}

impl Default for DagSection {
    fn default() -> Self {
        Self {
            channel_id: default_channel_id(),
        }
    }
}

/// `[limits]` section: resource-safety guard for an append-only graph.
///
/// `None` means unbounded. Enforcement is up to the caller; the store only
/// reports whether the next task or dependency would go past a limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct DagLimits {
    #[serde(default)]
    pub max_nodes: Option<usize>,

    #[serde(default)]
    pub max_edges: Option<usize>,
}

/// `[task.<id>]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskSpec {
    /// Tasks that must complete before this one may start.
    #[serde(default)]
    pub after: Vec<String>,

    /// Status to apply once the graph is built.
    #[serde(default)]
    pub status: TaskStatus,
}
