// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{PlanFile, RawPlanFile};
use crate::errors::Result;

/// Load a plan file from a given path and return the raw `RawPlanFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawPlanFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let plan: RawPlanFile = toml::from_str(&contents)?;

    Ok(plan)
}

/// Load a plan file from path and validate it.
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks for:
///   - unknown or repeated `after` references,
///   - self-dependencies,
///   - `[limits]` sanity and task / dependency counts.
///
/// Cycles are left to the store, which rejects them when the plan is
/// replayed with [`PlanFile::build_store`].
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<PlanFile> {
    let raw_plan = load_from_path(&path)?;
    let plan = PlanFile::try_from(raw_plan)?;
    Ok(plan)
}

/// Default plan path: `Taskdag.toml` in the current working directory.
pub fn default_plan_path() -> PathBuf {
    PathBuf::from("Taskdag.toml")
}
