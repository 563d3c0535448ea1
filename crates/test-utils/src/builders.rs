#![allow(dead_code)]

use taskdag::dag::TaskDagStore;
use taskdag::types::TaskStatus;

/// Builder for `TaskDagStore` to simplify test setup.
///
/// Every step goes through the public store API, so a built store satisfies
/// the same invariants as one assembled by an orchestrator.
pub struct DagBuilder {
    store: TaskDagStore,
    statuses: Vec<(String, TaskStatus)>,
}

impl DagBuilder {
    pub fn new() -> Self {
        Self::for_channel("test-channel")
    }

    pub fn for_channel(channel_id: &str) -> Self {
        Self {
            store: TaskDagStore::new(channel_id),
            statuses: Vec::new(),
        }
    }

    pub fn task(mut self, id: &str) -> Self {
        self.store
            .add_task(id)
            .unwrap_or_else(|e| panic!("add_task({id}) failed: {e}"));
        self
    }

    pub fn tasks(mut self, ids: &[&str]) -> Self {
        for id in ids {
            self = self.task(id);
        }
        self
    }

    /// `to` depends on `from`.
    pub fn dep(mut self, from: &str, to: &str) -> Self {
        self.store
            .add_dependency(from, to)
            .unwrap_or_else(|e| panic!("add_dependency({from}, {to}) failed: {e}"));
        self
    }

    /// Status applied after all tasks and dependencies exist.
    pub fn status(mut self, id: &str, status: TaskStatus) -> Self {
        self.statuses.push((id.to_string(), status));
        self
    }

    pub fn completed(self, id: &str) -> Self {
        self.status(id, TaskStatus::Completed)
    }

    pub fn build(mut self) -> TaskDagStore {
        for (id, status) in std::mem::take(&mut self.statuses) {
            self.store
                .set_status(&id, status)
                .unwrap_or_else(|e| panic!("set_status({id}) failed: {e}"));
        }
        self.store
    }
}

impl Default for DagBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// `ids[0] -> ids[1] -> ...`: each task depends on the previous one.
pub fn chain(ids: &[&str]) -> DagBuilder {
    let mut builder = DagBuilder::new().tasks(ids);
    for pair in ids.windows(2) {
        builder = builder.dep(pair[0], pair[1]);
    }
    builder
}

/// `A -> {B, C} -> D`.
pub fn diamond() -> DagBuilder {
    DagBuilder::new()
        .tasks(&["A", "B", "C", "D"])
        .dep("A", "B")
        .dep("A", "C")
        .dep("B", "D")
        .dep("C", "D")
}
