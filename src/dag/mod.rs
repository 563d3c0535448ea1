// src/dag/mod.rs

//! Task dependency DAG engine.
//!
//! - [`graph`] holds the data model: nodes, edges and both adjacency maps.
//! - [`store`] is the only mutation entry point and keeps them consistent.
//! - [`validator`] probes whether a candidate edge would close a cycle.
//! - [`readiness`] answers per-task ready / blocking questions.
//! - [`scheduler`] produces the topological order and ready/blocked/completed
//!   partition.
//! - [`parallelism`] groups open tasks into execution waves.
//! - [`critical_path`] finds the longest dependency chain.
//! - [`stats`] aggregates health metrics.
//! - [`shared`] wraps a store for single-writer / many-reader access.

pub mod critical_path;
pub mod graph;
pub mod parallelism;
pub mod readiness;
pub mod scheduler;
pub mod shared;
pub mod stats;
pub mod store;
pub mod validator;

pub use critical_path::{CriticalPath, find_critical_path};
pub use graph::{TaskDag, TaskDagEdge, TaskDagNode};
pub use parallelism::{find_parallel_groups, max_parallelism};
pub use readiness::{get_blocking_tasks, is_task_ready};
pub use scheduler::{TopologicalSchedule, next_assignable_tasks, topological_sort};
pub use shared::{DagSnapshot, SharedTaskDagStore};
pub use stats::{DagStats, compute_dag_stats};
pub use store::{StatusChange, TaskDagStore};
pub use validator::{dependency_path, would_create_cycle};
