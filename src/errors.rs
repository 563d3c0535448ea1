// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

use crate::types::TaskId;

/// Errors produced by the DAG engine.
///
/// Everything except [`DagError::Inconsistent`] is a structural rejection of a
/// single mutation: the store is left untouched and the caller can simply
/// reject the originating request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DagError {
    #[error("Task already exists: {0}")]
    DuplicateTask(TaskId),

    #[error("Task not found: {0}")]
    UnknownTask(TaskId),

    #[error("Task cannot depend on itself: {0}")]
    SelfDependency(TaskId),

    #[error("Dependency already declared: {from} -> {to}")]
    DuplicateEdge { from: TaskId, to: TaskId },

    #[error("Dependency {from} -> {to} would create a cycle")]
    Cycle { from: TaskId, to: TaskId },

    /// A read-only algorithm found tasks stuck in a cycle. Cycles are refused
    /// at insertion time, so this means the graph was corrupted.
    #[error("Internal consistency fault: tasks stuck in a cycle: {cycle_task_ids:?}")]
    Inconsistent { cycle_task_ids: Vec<TaskId> },
}

impl DagError {
    /// Whether this error must be escalated instead of reported to the caller
    /// of a mutation.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DagError::Inconsistent { .. })
    }
}

#[derive(Error, Debug)]
pub enum TaskdagError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("DAG error: {0}")]
    Dag(#[from] DagError),

    #[error("Limit exceeded: {0}")]
    LimitExceeded(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, TaskdagError>;
