// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod errors;
pub mod logging;
pub mod types;

use std::fmt::Write as _;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::cli::{CliArgs, View};
use crate::config::loader::{default_plan_path, load_and_validate};
use crate::dag::{
    TaskDag, compute_dag_stats, find_critical_path, find_parallel_groups, topological_sort,
};

pub use crate::dag::{SharedTaskDagStore, TaskDagStore};
pub use crate::errors::{DagError, TaskdagError};
pub use crate::types::{TaskId, TaskStatus};

/// High-level entry point used by `main.rs`.
///
/// Loads and validates the plan, replays it into a store and prints the
/// requested report to stdout.
pub fn run(args: CliArgs) -> Result<()> {
    let plan_path = args.plan.unwrap_or_else(default_plan_path);
    let plan = load_and_validate(&plan_path)
        .with_context(|| format!("loading plan {}", plan_path.display()))?;

    let store = plan.build_store()?;
    info!(
        channel = store.dag().channel_id(),
        tasks = store.dag().len(),
        dependencies = store.dag().edge_count(),
        "plan ready"
    );
    if store.would_exceed_task_limit() || store.would_exceed_edge_limit() {
        warn!(limits = ?store.limits(), "plan is at its configured capacity");
    }

    let report = render_report(store.dag(), args.view)?;
    print!("{report}");
    Ok(())
}

/// Render one view of the graph as plain text.
///
/// Internal-consistency faults are returned as errors, never papered over.
pub fn render_report(dag: &TaskDag, view: View) -> Result<String> {
    let mut out = String::new();
    let all = view == View::All;

    if view == View::Ready {
        for id in topological_sort(dag)?.ready_tasks {
            writeln!(out, "{id}")?;
        }
        return Ok(out);
    }

    if all {
        writeln!(out, "taskdag report")?;
        writeln!(out, "  channel = {}", dag.channel_id())?;
        writeln!(out, "  version = {}", dag.version())?;
        writeln!(out)?;
    }

    if all || view == View::Schedule {
        let schedule = topological_sort(dag)?;
        writeln!(out, "order: {}", schedule.order.join(" -> "))?;
        writeln!(out, "ready ({}): {:?}", schedule.ready_tasks.len(), schedule.ready_tasks)?;
        writeln!(out, "blocked ({}):", schedule.blocked_tasks.len())?;
        for id in &schedule.blocked_tasks {
            let status = dag.status_of(id).unwrap_or_default();
            let blocking = dag.node(id).map(|n| n.blocked_by().to_vec()).unwrap_or_default();
            writeln!(out, "  - {id} [{status}] waiting on {blocking:?}")?;
        }
        writeln!(
            out,
            "completed ({}): {:?}",
            schedule.completed_tasks.len(),
            schedule.completed_tasks
        )?;
        writeln!(out)?;
    }

    if all || view == View::Waves {
        let groups = find_parallel_groups(dag)?;
        writeln!(out, "waves ({}):", groups.len())?;
        for (i, group) in groups.iter().enumerate() {
            writeln!(out, "  {}: {}", i + 1, group.join(", "))?;
        }
        writeln!(out)?;
    }

    if all || view == View::CriticalPath {
        let path = find_critical_path(dag)?;
        writeln!(out, "critical path ({}): {}", path.len(), path.tasks.join(" -> "))?;
        writeln!(out)?;
    }

    if all || view == View::Stats {
        let stats = compute_dag_stats(dag)?;
        writeln!(out, "stats:")?;
        writeln!(out, "  nodes = {}", stats.node_count)?;
        writeln!(out, "  edges = {}", stats.edge_count)?;
        writeln!(out, "  ready = {}", stats.ready_task_count)?;
        writeln!(
            out,
            "  blocked = {} (in progress {}, failed {})",
            stats.blocked_task_count, stats.in_progress_task_count, stats.failed_task_count
        )?;
        writeln!(out, "  completed = {}", stats.completed_task_count)?;
        writeln!(out, "  roots = {}", stats.root_count)?;
        writeln!(out, "  avg in-degree = {:.2}", stats.average_in_degree)?;
        writeln!(out, "  avg out-degree = {:.2}", stats.average_out_degree)?;
        writeln!(out, "  max depth = {}", stats.max_depth)?;
    }

    debug!(?view, bytes = out.len(), "report rendered");
    Ok(out)
}
