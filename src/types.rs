// src/types.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Canonical task identifier type used throughout the engine.
pub type TaskId = String;

/// Lifecycle status of a task node.
///
/// - `Pending`: created, not yet picked up by an agent.
/// - `InProgress`: an agent is working on it.
/// - `Completed`: finished successfully; unblocks its dependents.
/// - `Failed`: finished unsuccessfully; dependents stay blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl TaskStatus {
    pub fn is_completed(self) -> bool {
        matches!(self, TaskStatus::Completed)
    }

    pub fn is_pending(self) -> bool {
        matches!(self, TaskStatus::Pending)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Pending
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "in_progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            "failed" => Ok(TaskStatus::Failed),
            other => Err(format!(
                "invalid task status: {other} (expected \"pending\", \"in_progress\", \"completed\" or \"failed\")"
            )),
        }
    }
}
