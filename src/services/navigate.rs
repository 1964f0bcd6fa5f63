// src/services/navigate.rs

//! Search-result pagination with rate limiting and retry.

use std::thread;
use std::time::Duration;

use url::Url;

use crate::error::{AppError, Result};
use crate::models::{ScraperConfig, SiteConfig};
use crate::services::browser::BrowserSession;
use crate::services::extract::Extractor;
use crate::services::search::SearchQuery;

/// Seam between the orchestrator and the browser-driven pager.
///
/// `fetch_page` returns the raw listing fragments of one search results
/// page, or an error once the page's retries are exhausted.
pub trait PageFetcher {
    fn fetch_page(&mut self, query: &SearchQuery, page: u32) -> Result<Vec<String>>;
}

/// Build the search URL for a query and page number.
///
/// Page 1 carries no `page` parameter, matching the site's own links.
pub fn build_search_url(site: &SiteConfig, query: &SearchQuery, page: u32) -> Result<String> {
    let mut url = Url::parse(&site.base_url)?.join(&site.search_path)?;

    {
        let mut pairs = url.query_pairs_mut();
        if !query.keyword.is_empty() {
            pairs.append_pair("searchstring", &query.keyword);
        }
        if !query.location.is_empty() {
            pairs.append_pair("locationstring", &query.location);
        }
        pairs.append_pair("sort", &site.sort);
        if page > 1 {
            pairs.append_pair("page", &page.to_string());
        }
    }

    Ok(url.into())
}

/// Drives the browser through search-result pages.
///
/// Applies the configured fixed delay before every request beyond the
/// session's first, and retries a failed page a bounded number of times
/// with the same delay between attempts.
pub struct SearchPager<'a> {
    session: &'a BrowserSession,
    extractor: &'a Extractor,
    site: &'a SiteConfig,
    scraper: &'a ScraperConfig,
    requests_issued: u32,
}

impl<'a> SearchPager<'a> {
    pub fn new(
        session: &'a BrowserSession,
        extractor: &'a Extractor,
        site: &'a SiteConfig,
        scraper: &'a ScraperConfig,
    ) -> Self {
        Self {
            session,
            extractor,
            site,
            scraper,
            requests_issued: 0,
        }
    }

    fn pace(&mut self) {
        if self.requests_issued > 0 && self.scraper.page_delay_secs > 0 {
            log::debug!("Waiting {}s before next request", self.scraper.page_delay_secs);
            thread::sleep(Duration::from_secs(self.scraper.page_delay_secs));
        }
        self.requests_issued += 1;
    }
}

impl PageFetcher for SearchPager<'_> {
    fn fetch_page(&mut self, query: &SearchQuery, page: u32) -> Result<Vec<String>> {
        let url = build_search_url(self.site, query, page)?;
        let mut last_error = None;

        for attempt in 1..=self.scraper.max_retries {
            self.pace();

            match self.session.rendered_html(&url) {
                Ok(html) => return Ok(self.extractor.listing_fragments(&html)),
                Err(error) => {
                    log::warn!(
                        "Page {page} attempt {attempt}/{} failed: {error}",
                        self.scraper.max_retries
                    );
                    last_error = Some(error);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| AppError::navigation(url, "retries exhausted")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(keyword: &str, location: &str) -> SearchQuery {
        SearchQuery {
            keyword: keyword.to_string(),
            location: location.to_string(),
            max_pages: 1,
            job_bank_only: false,
        }
    }

    #[test]
    fn url_for_first_page_has_no_page_param() {
        let url = build_search_url(&SiteConfig::default(), &query("python developer", "Toronto, ON"), 1)
            .unwrap();
        assert_eq!(
            url,
            "https://www.jobbank.gc.ca/jobsearch/jobsearch?searchstring=python+developer&locationstring=Toronto%2C+ON&sort=D"
        );
    }

    #[test]
    fn url_for_later_pages_carries_page_param() {
        let url = build_search_url(&SiteConfig::default(), &query("welder", ""), 3).unwrap();
        assert_eq!(
            url,
            "https://www.jobbank.gc.ca/jobsearch/jobsearch?searchstring=welder&sort=D&page=3"
        );
    }

    #[test]
    fn url_omits_empty_terms() {
        let url = build_search_url(&SiteConfig::default(), &query("", "Vancouver"), 1).unwrap();
        assert_eq!(
            url,
            "https://www.jobbank.gc.ca/jobsearch/jobsearch?locationstring=Vancouver&sort=D"
        );
    }
}
