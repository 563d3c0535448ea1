// src/config/mod.rs

//! Plan file loading and validation.
//!
//! Responsibilities:
//! - Define the TOML-backed data model, including `[limits]` (`model.rs`).
//! - Load a plan file from disk (`loader.rs`).
//! - Validate references and limits (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_plan_path, load_and_validate, load_from_path};
pub use model::{DagLimits, DagSection, PlanFile, RawPlanFile, TaskSpec};
