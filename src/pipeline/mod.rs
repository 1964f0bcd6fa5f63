// src/pipeline/mod.rs

//! Pipeline entry points for the CLI.
//!
//! - `run_search`: one search end to end (browse → extract → persist → export)
//! - `run_batch`: a list of searches from a TOML file
//! - `run_stats` / `run_export`: store maintenance

pub mod batch;
pub mod maintain;
pub mod search;

pub use batch::{BatchOptions, BatchSummary, run_batch};
pub use maintain::{run_export, run_stats};
pub use search::{RunOptions, SearchReport, run_search};
