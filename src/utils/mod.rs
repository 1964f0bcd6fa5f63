//! Utility functions and helpers.

use chrono::Local;
use url::Url;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Extract the job identifier from a listing href.
///
/// Posting links look like `/jobsearch/jobposting/39078480;jsessionid=...`:
/// the id is the final path segment with any `;`-delimited session suffix
/// dropped. A href without path separators carries no id.
pub fn job_id_from_href(href: &str) -> Option<String> {
    if !href.contains('/') {
        return None;
    }

    let path = href.split(['?', '#']).next().unwrap_or(href);
    let last = path.rsplit('/').next()?;
    let id = last.split(';').next().unwrap_or(last).trim();

    (!id.is_empty()).then(|| id.to_string())
}

/// Default output file stem, derived from the current local time.
pub fn default_output_stem() -> String {
    format!("jobbank_jobs_{}", Local::now().format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_url() {
        let base = Url::parse("https://www.jobbank.gc.ca").unwrap();
        assert_eq!(
            resolve_url(&base, "/jobsearch/jobposting/39078480"),
            "https://www.jobbank.gc.ca/jobsearch/jobposting/39078480"
        );
        assert_eq!(
            resolve_url(&base, "https://other.com/x"),
            "https://other.com/x"
        );
    }

    #[test]
    fn test_job_id_from_href() {
        assert_eq!(
            job_id_from_href("/jobsearch/jobposting/39078480;jsessionid=8E2A"),
            Some("39078480".to_string())
        );
        assert_eq!(
            job_id_from_href("/jobsearch/jobposting/39078480"),
            Some("39078480".to_string())
        );
    }

    #[test]
    fn test_job_id_from_href_without_path() {
        assert_eq!(job_id_from_href("39078480"), None);
        assert_eq!(job_id_from_href(""), None);
    }

    #[test]
    fn test_job_id_ignores_query() {
        assert_eq!(
            job_id_from_href("/jobsearch/jobposting/123?source=searchresults"),
            Some("123".to_string())
        );
    }

    #[test]
    fn test_default_output_stem_shape() {
        let stem = default_output_stem();
        assert!(stem.starts_with("jobbank_jobs_"));
        assert_eq!(stem.len(), "jobbank_jobs_".len() + 15);
    }
}
