// src/services/extract.rs

//! Field extraction from rendered job-listing markup.
//!
//! A search results page contains one `a.resultJobItem` anchor per posting.
//! The extractor slices a rendered page into those fragments and pulls the
//! posting fields out of each one. Extraction failure is per-field: a missing
//! element yields an empty/absent value, and only a fragment with no
//! recognizable listing anchor, link or title is dropped entirely.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{CleaningConfig, JobPosting, SiteConfig, Source};
use crate::utils::{job_id_from_href, resolve_url};

/// CSS selector matching one job listing on a search results page.
pub const LISTING_SELECTOR: &str = "a.resultJobItem";

/// Parsed selectors for the fixed Job Bank listing structure.
struct ListingSelectors {
    row: Selector,
    title: Selector,
    date: Selector,
    business: Selector,
    location: Selector,
    salary: Selector,
    telework: Selector,
    posted_on_jb: Selector,
    source_item: Selector,
    source_span: Selector,
}

impl ListingSelectors {
    fn parse() -> Result<Self> {
        Ok(Self {
            row: parse_selector(LISTING_SELECTOR)?,
            title: parse_selector("span.noctitle")?,
            date: parse_selector("ul.list-unstyled li.date")?,
            business: parse_selector("ul.list-unstyled li.business")?,
            location: parse_selector("ul.list-unstyled li.location")?,
            salary: parse_selector("ul.list-unstyled li.salary")?,
            telework: parse_selector("span.telework")?,
            posted_on_jb: parse_selector("span.postedonJB")?,
            source_item: parse_selector("ul.list-unstyled li.source")?,
            source_span: parse_selector("span.job-source")?,
        })
    }
}

/// Extracts structured postings from rendered listing markup.
pub struct Extractor {
    base_url: Url,
    cleaning: CleaningConfig,
    selectors: ListingSelectors,
}

impl Extractor {
    /// Create an extractor for the configured site.
    pub fn new(site: &SiteConfig, cleaning: CleaningConfig) -> Result<Self> {
        Ok(Self {
            base_url: Url::parse(&site.base_url)?,
            cleaning,
            selectors: ListingSelectors::parse()?,
        })
    }

    /// Slice a rendered search results page into per-listing fragments.
    pub fn listing_fragments(&self, page_html: &str) -> Vec<String> {
        let document = Html::parse_document(page_html);
        document
            .select(&self.selectors.row)
            .map(|element| element.html())
            .collect()
    }

    /// Extract a posting from one listing fragment.
    ///
    /// Returns `None` when the fragment has no recognizable listing anchor,
    /// no link or no title, so the caller can skip it.
    pub fn extract(&self, fragment_html: &str) -> Option<JobPosting> {
        let fragment = Html::parse_fragment(fragment_html);
        let anchor = fragment.select(&self.selectors.row).next()?;

        let href = anchor.value().attr("href")?;
        let url = resolve_url(&self.base_url, href);
        let job_id = job_id_from_href(href);

        let title = self.clean_text_of(&anchor, &self.selectors.title)?;
        if title.is_empty() {
            return None;
        }

        let company = self
            .clean_text_of(&anchor, &self.selectors.business)
            .unwrap_or_default();
        let location = self
            .clean_text_of(&anchor, &self.selectors.location)
            .unwrap_or_default();
        let date_posted = self.optional_field(&anchor, &self.selectors.date);
        let salary = self.optional_field(&anchor, &self.selectors.salary);
        let job_type = self.optional_field(&anchor, &self.selectors.telework);

        Some(JobPosting {
            job_id,
            title,
            company,
            location,
            salary,
            job_type,
            date_posted,
            url,
            source: self.source_of(&anchor),
        })
    }

    /// Determine the posting origin.
    ///
    /// A `postedonJB` badge marks a direct posting; otherwise the partner
    /// label is read from the details list or the `job-source` span, and no
    /// label at all also means a direct posting.
    fn source_of(&self, anchor: &ElementRef<'_>) -> Source {
        if anchor.select(&self.selectors.posted_on_jb).next().is_some() {
            return Source::JobBank;
        }

        let label = anchor
            .select(&self.selectors.source_item)
            .next()
            .or_else(|| anchor.select(&self.selectors.source_span).next())
            .map(|element| self.cleaning.clean(&element.text().collect::<String>()))
            .unwrap_or_default();

        Source::parse(&label)
    }

    fn clean_text_of(&self, anchor: &ElementRef<'_>, selector: &Selector) -> Option<String> {
        anchor
            .select(selector)
            .next()
            .map(|element| self.cleaning.clean(&element.text().collect::<String>()))
    }

    fn optional_field(&self, anchor: &ElementRef<'_>, selector: &Selector) -> Option<String> {
        self.clean_text_of(anchor, selector)
            .filter(|value| !value.is_empty())
    }
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SiteConfig;

    fn extractor() -> Extractor {
        Extractor::new(&SiteConfig::default(), CleaningConfig::default()).unwrap()
    }

    const FULL_LISTING: &str = r#"
        <a class="resultJobItem" href="/jobsearch/jobposting/39078480;jsessionid=8E2A">
          <h3 class="title"><span class="noctitle">software developer</span></h3>
          <ul class="list-unstyled">
            <li class="date">January 15, 2026</li>
            <li class="business">Acme Widgets Ltd.</li>
            <li class="location">Location Toronto (ON)</li>
            <li class="salary">Salary $45.00 hourly</li>
          </ul>
          <span class="telework">Remote</span>
          <span class="postedonJB">Posted on Job Bank</span>
        </a>
    "#;

    const PARTNER_LISTING: &str = r#"
        <a class="resultJobItem" href="/jobsearch/jobposting/40000001">
          <h3 class="title"><span class="noctitle">data analyst</span></h3>
          <ul class="list-unstyled">
            <li class="business">Maple Data Inc.</li>
            <li class="location">Location Vancouver (BC)</li>
            <li class="source">Posted on Indeed.com</li>
          </ul>
        </a>
    "#;

    #[test]
    fn extract_full_listing() {
        let posting = extractor().extract(FULL_LISTING).unwrap();
        assert_eq!(posting.job_id.as_deref(), Some("39078480"));
        assert_eq!(posting.title, "software developer");
        assert_eq!(posting.company, "Acme Widgets Ltd.");
        assert_eq!(posting.location, "Toronto (ON)");
        assert_eq!(posting.salary.as_deref(), Some("$45.00 hourly"));
        assert_eq!(posting.job_type.as_deref(), Some("Remote"));
        assert_eq!(posting.date_posted.as_deref(), Some("January 15, 2026"));
        assert_eq!(
            posting.url,
            "https://www.jobbank.gc.ca/jobsearch/jobposting/39078480;jsessionid=8E2A"
        );
        assert_eq!(posting.source, Source::JobBank);
    }

    #[test]
    fn extract_partner_listing() {
        let posting = extractor().extract(PARTNER_LISTING).unwrap();
        assert_eq!(posting.source, Source::Partner("Indeed".to_string()));
        assert_eq!(posting.salary, None);
        assert_eq!(posting.job_type, None);
    }

    #[test]
    fn extract_sparse_listing_keeps_partial_record() {
        let fragment = r#"
            <a class="resultJobItem" href="/jobsearch/jobposting/123">
              <span class="noctitle">welder</span>
            </a>
        "#;
        let posting = extractor().extract(fragment).unwrap();
        assert_eq!(posting.title, "welder");
        assert_eq!(posting.company, "");
        assert_eq!(posting.location, "");
        assert_eq!(posting.salary, None);
        // No partner marker anywhere means a direct posting.
        assert_eq!(posting.source, Source::JobBank);
    }

    #[test]
    fn extract_rejects_unrecognizable_fragment() {
        assert!(extractor().extract("<div>advertisement</div>").is_none());
    }

    #[test]
    fn extract_rejects_listing_without_title() {
        let fragment = r#"<a class="resultJobItem" href="/jobsearch/jobposting/123"></a>"#;
        assert!(extractor().extract(fragment).is_none());
    }

    #[test]
    fn extract_rejects_listing_without_href() {
        let fragment = r#"<a class="resultJobItem"><span class="noctitle">welder</span></a>"#;
        assert!(extractor().extract(fragment).is_none());
    }

    #[test]
    fn listing_fragments_slices_page_in_order() {
        let page = format!("<html><body>{FULL_LISTING}{PARTNER_LISTING}</body></html>");
        let fragments = extractor().listing_fragments(&page);
        assert_eq!(fragments.len(), 2);
        assert!(fragments[0].contains("39078480"));
        assert!(fragments[1].contains("40000001"));
    }

    #[test]
    fn listing_fragments_empty_page() {
        assert!(extractor()
            .listing_fragments("<html><body>no results</body></html>")
            .is_empty());
    }
}
