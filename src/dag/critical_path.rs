// src/dag/critical_path.rs

use std::collections::HashMap;

use serde::Serialize;

use crate::dag::graph::TaskDag;
use crate::dag::scheduler::topological_order;
use crate::errors::DagError;
use crate::types::TaskId;

/// Longest chain of dependent tasks, from the earliest dependency to the
/// last dependent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CriticalPath {
    pub tasks: Vec<TaskId>,
}

impl CriticalPath {
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Compute the longest unweighted dependency chain.
///
/// `depth(n) = 1 + max(depth(p) for p in depends_on(n))`, or `1` for a task
/// without dependencies, evaluated in topological order. Ties go to the task
/// found first in topological order, and to the first maximal entry of
/// `depends_on` when walking back.
pub fn find_critical_path(dag: &TaskDag) -> Result<CriticalPath, DagError> {
    let order = topological_order(dag)?;

    let mut depth: HashMap<&str, usize> = HashMap::with_capacity(order.len());
    let mut best_pred: HashMap<&str, &str> = HashMap::new();
    let mut tail: Option<(&str, usize)> = None;

    for id in &order {
        let mut node_depth = 1;
        for dep in dag.dependencies_of(id) {
            let Some(&dep_depth) = depth.get(dep.as_str()) else {
                continue;
            };
            if dep_depth + 1 > node_depth {
                node_depth = dep_depth + 1;
                best_pred.insert(id.as_str(), dep.as_str());
            }
        }
        depth.insert(id.as_str(), node_depth);

        if tail.is_none_or(|(_, best)| node_depth > best) {
            tail = Some((id.as_str(), node_depth));
        }
    }

    let mut tasks = Vec::new();
    let mut cursor = tail.map(|(id, _)| id);
    while let Some(id) = cursor {
        tasks.push(id.to_string());
        cursor = best_pred.get(id).copied();
    }
    tasks.reverse();

    Ok(CriticalPath { tasks })
}
