// src/pipeline/maintain.rs

//! Store maintenance pipelines: statistics and full exports.

use std::path::Path;

use crate::error::Result;
use crate::export::{self, Format};
use crate::models::Config;
use crate::storage::JobStore;

/// Log aggregate statistics for the persisted store.
pub fn run_stats(config: &Config) -> Result<()> {
    let store = JobStore::open(&config.store.path)?;
    let stats = store.stats()?;

    log::info!(
        "Jobs in store: {} total ({} active, {} inactive)",
        stats.total_jobs,
        stats.active_jobs,
        stats.inactive_jobs
    );
    log::info!("Added in the last 24 hours: {}", stats.added_last_day);

    if !stats.by_source.is_empty() {
        log::info!("Jobs by source:");
        for (source, count) in &stats.by_source {
            log::info!("  {source}: {count}");
        }
    }

    Ok(())
}

/// Export persisted records to a file, independent of any search.
pub fn run_export(
    config: &Config,
    output: &Path,
    format: Format,
    source: Option<&str>,
    include_inactive: bool,
) -> Result<()> {
    let store = JobStore::open(&config.store.path)?;
    let records = match source {
        Some(source) => store.jobs_by_source(source)?,
        None => store.all_jobs(!include_inactive)?,
    };

    export::write(output, &records, format)?;
    log::info!("Exported {} record(s) to {}", records.len(), output.display());

    Ok(())
}
