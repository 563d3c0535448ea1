// src/config/validate.rs

use std::collections::HashSet;

use crate::config::model::{PlanFile, RawPlanFile};
use crate::errors::{Result, TaskdagError};

impl TryFrom<RawPlanFile> for PlanFile {
    type Error = crate::errors::TaskdagError;

    fn try_from(raw: RawPlanFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_plan(&raw)?;
        Ok(PlanFile::new_unchecked(raw.dag, raw.limits, raw.task))
    }
}

fn validate_raw_plan(plan: &RawPlanFile) -> Result<()> {
    ensure_has_tasks(plan)?;
    validate_limits_section(plan)?;
    validate_task_dependencies(plan)?;
    validate_within_limits(plan)?;
    Ok(())
}

fn ensure_has_tasks(plan: &RawPlanFile) -> Result<()> {
    if plan.task.is_empty() {
        return Err(TaskdagError::ConfigError(
            "plan must contain at least one [task.<id>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_limits_section(plan: &RawPlanFile) -> Result<()> {
    if plan.limits.max_nodes == Some(0) {
        return Err(TaskdagError::ConfigError(
            "[limits].max_nodes must be >= 1 (got 0)".to_string(),
        ));
    }
    if plan.limits.max_edges == Some(0) {
        return Err(TaskdagError::ConfigError(
            "[limits].max_edges must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_task_dependencies(plan: &RawPlanFile) -> Result<()> {
    for (id, task) in plan.task.iter() {
        let mut seen = HashSet::new();
        for dep in task.after.iter() {
            if !plan.task.contains_key(dep) {
                return Err(TaskdagError::ConfigError(format!(
                    "task '{}' has unknown dependency '{}' in `after`",
                    id, dep
                )));
            }
            if dep == id {
                return Err(TaskdagError::ConfigError(format!(
                    "task '{}' cannot depend on itself in `after`",
                    id
                )));
            }
            if !seen.insert(dep) {
                return Err(TaskdagError::ConfigError(format!(
                    "task '{}' lists '{}' more than once in `after`",
                    id, dep
                )));
            }
        }
    }
    Ok(())
}

fn validate_within_limits(plan: &RawPlanFile) -> Result<()> {
    let nodes = plan.task.len();
    if let Some(max) = plan.limits.max_nodes {
        if nodes > max {
            return Err(TaskdagError::LimitExceeded(format!(
                "plan declares {nodes} tasks but [limits].max_nodes is {max}"
            )));
        }
    }

    let edges: usize = plan.task.values().map(|t| t.after.len()).sum();
    if let Some(max) = plan.limits.max_edges {
        if edges > max {
            return Err(TaskdagError::LimitExceeded(format!(
                "plan declares {edges} dependencies but [limits].max_edges is {max}"
            )));
        }
    }
    Ok(())
}
