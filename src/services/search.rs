// src/services/search.rs

//! Search orchestration across pages.

use crate::models::JobPosting;
use crate::services::extract::Extractor;
use crate::services::navigate::PageFetcher;

/// Parameters of one job search.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    /// Job keyword or title; may be empty when searching by location only
    pub keyword: String,

    /// City, province or postal code; may be empty
    pub location: String,

    /// Pages to scrape, from page 1 inclusive
    pub max_pages: u32,

    /// Keep only postings made directly on the Job Bank
    pub job_bank_only: bool,
}

/// Result of one search run.
///
/// `pages_scraped < pages_requested` means pagination halted early, either
/// on an irrecoverable page failure or because a page came back empty.
#[derive(Debug, Default)]
pub struct SearchOutcome {
    /// Extracted postings, in site order within and across pages
    pub postings: Vec<JobPosting>,

    /// Pages the caller asked for
    pub pages_requested: u32,

    /// Pages actually fetched and extracted
    pub pages_scraped: u32,
}

impl SearchOutcome {
    /// True when fewer pages were scraped than requested.
    pub fn is_partial(&self) -> bool {
        self.pages_scraped < self.pages_requested
    }
}

/// Composes the pager and the extractor over N requested pages.
pub struct JobSearch<'a, F: PageFetcher> {
    fetcher: &'a mut F,
    extractor: &'a Extractor,
}

impl<'a, F: PageFetcher> JobSearch<'a, F> {
    pub fn new(fetcher: &'a mut F, extractor: &'a Extractor) -> Self {
        Self { fetcher, extractor }
    }

    /// Run the search, accumulating postings page by page.
    ///
    /// A page whose retries are exhausted halts pagination but keeps
    /// everything gathered so far; a page with no listings ends the
    /// search the same way the site's own pagination runs out.
    pub fn run(&mut self, query: &SearchQuery) -> SearchOutcome {
        let mut outcome = SearchOutcome {
            pages_requested: query.max_pages,
            ..SearchOutcome::default()
        };

        for page in 1..=query.max_pages {
            log::info!("Scraping page {page}/{}", query.max_pages);

            let fragments = match self.fetcher.fetch_page(query, page) {
                Ok(fragments) => fragments,
                Err(error) => {
                    log::warn!("Giving up on page {page}: {error}");
                    break;
                }
            };

            outcome.pages_scraped += 1;

            if fragments.is_empty() {
                log::info!("No more listings on page {page}");
                break;
            }

            let mut kept = 0usize;
            for fragment in &fragments {
                match self.extractor.extract(fragment) {
                    Some(posting) => {
                        if query.job_bank_only && !posting.source.is_job_bank() {
                            continue;
                        }
                        outcome.postings.push(posting);
                        kept += 1;
                    }
                    None => log::debug!("Skipping unrecognizable fragment on page {page}"),
                }
            }

            log::info!("Page {page}: {kept} of {} listings kept", fragments.len());
        }

        outcome
    }
}
