// src/dag/validator.rs

//! Cycle probe for candidate dependency edges.

use std::collections::{HashMap, VecDeque};

use crate::dag::graph::TaskDag;
use crate::types::TaskId;

/// Whether committing `from -> to` (`to` depends on `from`) would close a
/// cycle in an otherwise acyclic graph.
///
/// The probe is a breadth-first search from `to` over existing edges only:
/// if `from` is reachable, then `to -> ... -> from -> to` would be a loop.
/// Nothing is mutated. Cost is O(V + E).
pub fn would_create_cycle(dag: &TaskDag, from: &str, to: &str) -> bool {
    from == to || dependency_path(dag, to, from).is_some()
}

/// Shortest chain of edges leading from `start` to `target`, both ends
/// included, or `None` if `target` is not downstream of `start`.
pub fn dependency_path(dag: &TaskDag, start: &str, target: &str) -> Option<Vec<TaskId>> {
    if !dag.contains_task(start) || !dag.contains_task(target) {
        return None;
    }
    if start == target {
        return Some(vec![start.to_string()]);
    }

    // child -> parent, also serves as the visited set.
    let mut parent: HashMap<&str, &str> = HashMap::new();
    let mut queue: VecDeque<&str> = VecDeque::from([start]);
    parent.insert(start, start);

    while let Some(current) = queue.pop_front() {
        for next in dag.dependents_of(current) {
            if parent.contains_key(next) {
                continue;
            }
            parent.insert(next, current);

            if next == target {
                let mut path = vec![next.to_string()];
                let mut cursor = next;
                while cursor != start {
                    cursor = parent[cursor];
                    path.push(cursor.to_string());
                }
                path.reverse();
                return Some(path);
            }

            queue.push_back(next);
        }
    }

    None
}
