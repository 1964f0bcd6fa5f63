// src/pipeline/search.rs

//! Single-search pipeline: browse → extract → persist → export.

use std::path::PathBuf;

use crate::error::Result;
use crate::export::{self, Format};
use crate::models::Config;
use crate::services::{BrowserSession, Extractor, JobSearch, SearchOutcome, SearchPager, SearchQuery};
use crate::storage::{JobStore, UpsertStats};

/// Per-invocation knobs that are not part of the query itself.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Run the browser without a visible window
    pub headless: bool,

    /// Upsert results into the persisted store
    pub use_store: bool,

    /// Export file destination
    pub output: PathBuf,

    /// Export file format
    pub format: Format,
}

/// What one search run produced.
#[derive(Debug)]
pub struct SearchReport {
    pub outcome: SearchOutcome,

    /// `None` when the store was disabled or unreachable
    pub upsert: Option<UpsertStats>,

    pub output: PathBuf,
}

/// Run one search end to end.
///
/// Persistence and file export are independent failure domains: a store
/// failure is logged and the in-memory results still reach the file.
pub fn run_search(config: &Config, query: &SearchQuery, options: &RunOptions) -> Result<SearchReport> {
    log::info!(
        "Searching for '{}' in '{}', up to {} page(s)",
        query.keyword,
        query.location,
        query.max_pages
    );

    let session = BrowserSession::launch(&config.scraper, options.headless)?;
    let extractor = Extractor::new(&config.site, config.cleaning.clone())?;
    let mut pager = SearchPager::new(&session, &extractor, &config.site, &config.scraper);

    let outcome = JobSearch::new(&mut pager, &extractor).run(query);

    if outcome.is_partial() {
        log::warn!(
            "Partial results: {} of {} requested page(s) scraped",
            outcome.pages_scraped,
            outcome.pages_requested
        );
    }
    log::info!(
        "Scraped {} posting(s) from {} page(s)",
        outcome.postings.len(),
        outcome.pages_scraped
    );

    let upsert = if options.use_store {
        match JobStore::open(&config.store.path)
            .and_then(|store| store.upsert_batch(&outcome.postings))
        {
            Ok(stats) => {
                log::info!(
                    "Store: {} new, {} already known, {} without id skipped",
                    stats.inserted,
                    stats.updated,
                    stats.skipped
                );
                Some(stats)
            }
            Err(error) => {
                log::error!("Persisting results failed, continuing with file export: {error}");
                None
            }
        }
    } else {
        None
    };

    export::write(&options.output, &outcome.postings, options.format)?;
    log::info!(
        "Wrote {} posting(s) to {}",
        outcome.postings.len(),
        options.output.display()
    );

    Ok(SearchReport {
        outcome,
        upsert,
        output: options.output.clone(),
    })
}
