//! Job posting data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a posting originates: the Job Bank itself, or an aggregated
/// partner site such as Indeed or CareerBeacon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Source {
    /// Posted directly on the Job Bank
    JobBank,

    /// Aggregated from a partner site, tagged with its display name
    Partner(String),
}

impl Source {
    /// Interpret a raw source label scraped from a listing.
    ///
    /// Known partners are normalized case-insensitively; an empty label
    /// means the listing carried no external-source marker.
    pub fn parse(label: &str) -> Self {
        let trimmed = label.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("job bank") {
            return Self::JobBank;
        }

        let lower = trimmed.to_lowercase();
        if lower.contains("indeed") {
            Self::Partner("Indeed".to_string())
        } else if lower.contains("careerbeacon") {
            Self::Partner("CareerBeacon".to_string())
        } else {
            Self::Partner(trimmed.to_string())
        }
    }

    /// True for postings that originate on the Job Bank itself.
    pub fn is_job_bank(&self) -> bool {
        matches!(self, Self::JobBank)
    }

    /// Display label, as stored and exported.
    pub fn label(&self) -> &str {
        match self {
            Self::JobBank => "Job Bank",
            Self::Partner(name) => name,
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl From<Source> for String {
    fn from(source: Source) -> Self {
        source.label().to_string()
    }
}

impl From<String> for Source {
    fn from(label: String) -> Self {
        Source::parse(&label)
    }
}

/// One job listing as extracted from a search result page.
///
/// Extraction is best-effort: `title`, `company` and `location` may be
/// empty, the optional fields absent. `job_id` is the stable dedup key
/// when the site provides one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    /// Identifier assigned by the site; `None` when the listing link
    /// carries no recognizable id
    pub job_id: Option<String>,

    /// Posting title
    pub title: String,

    /// Employer name
    pub company: String,

    /// Posting location (city/province)
    pub location: String,

    /// Salary text as shown on the listing
    pub salary: Option<String>,

    /// Work arrangement (remote, on site, hybrid)
    pub job_type: Option<String>,

    /// Posting date as shown on the listing
    pub date_posted: Option<String>,

    /// Absolute link to the posting
    pub url: String,

    /// Posting origin
    pub source: Source,
}

impl JobPosting {
    /// The dedup key, if the posting can be persisted at all.
    pub fn dedup_key(&self) -> Option<&str> {
        self.job_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// A job posting as persisted in the store.
///
/// `scraped_at` is set once at first insert and never mutated;
/// `last_seen` is bumped every time the same `job_id` is re-encountered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredJob {
    pub job_id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub salary: Option<String>,
    pub job_type: Option<String>,
    pub date_posted: Option<String>,
    pub url: String,
    pub source: Source,
    pub scraped_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub is_active: bool,
}
