// src/pipeline/batch.rs

//! Batch mode: run a list of searches from a TOML file.
//!
//! ```toml
//! [[searches]]
//! keyword = "python developer"
//! location = "Toronto, ON"
//! pages = 3
//!
//! [[searches]]
//! location = "Vancouver"
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::export::Format;
use crate::models::Config;
use crate::pipeline::search::{RunOptions, run_search};
use crate::services::SearchQuery;

/// A batch definition file.
#[derive(Debug, Deserialize)]
pub struct BatchFile {
    #[serde(default)]
    pub searches: Vec<BatchSearch>,
}

/// One search entry in a batch file.
#[derive(Debug, Deserialize)]
pub struct BatchSearch {
    #[serde(default)]
    pub keyword: String,

    #[serde(default)]
    pub location: String,

    #[serde(default = "default_pages")]
    pub pages: u32,
}

fn default_pages() -> u32 {
    1
}

impl BatchFile {
    /// Load and validate a batch file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let file: BatchFile = toml::from_str(&content)?;
        file.validate()?;
        Ok(file)
    }

    fn validate(&self) -> Result<()> {
        if self.searches.is_empty() {
            return Err(AppError::config("batch file has no [[searches]] entries"));
        }
        for (idx, search) in self.searches.iter().enumerate() {
            if search.keyword.trim().is_empty() && search.location.trim().is_empty() {
                return Err(AppError::config(format!(
                    "searches[{idx}] needs a keyword or a location"
                )));
            }
        }
        Ok(())
    }
}

impl BatchSearch {
    /// Output file stem derived from the search terms.
    pub fn output_stem(&self, ordinal: usize) -> String {
        let mut parts = Vec::new();
        if !self.keyword.is_empty() {
            parts.push(self.keyword.replace(' ', "_"));
        }
        if !self.location.is_empty() {
            parts.push(self.location.replace(' ', "_").replace(',', ""));
        }

        if parts.is_empty() {
            format!("batch_search_{ordinal}")
        } else {
            parts.join("_")
        }
    }
}

/// Knobs shared by every search in a batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub headless: bool,
    pub use_store: bool,
    pub job_bank_only: bool,
    pub format: Format,
}

/// Totals from a batch run.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub searches_requested: usize,
    pub searches_completed: usize,
    pub postings: usize,
}

/// Run every search in the batch file, one browser session per search.
///
/// A failed search is logged and the batch moves on to the next entry.
pub fn run_batch(config: &Config, path: &Path, options: &BatchOptions) -> Result<BatchSummary> {
    let batch = BatchFile::load(path)?;
    let mut summary = BatchSummary {
        searches_requested: batch.searches.len(),
        ..BatchSummary::default()
    };

    log::info!("Running {} search(es) from {}", batch.searches.len(), path.display());

    for (idx, search) in batch.searches.iter().enumerate() {
        let ordinal = idx + 1;
        log::info!(
            "[{ordinal}/{}] '{}' in '{}'",
            batch.searches.len(),
            search.keyword,
            search.location
        );

        let query = SearchQuery {
            keyword: search.keyword.clone(),
            location: search.location.clone(),
            max_pages: search.pages,
            job_bank_only: options.job_bank_only,
        };
        let output = config
            .output
            .dir
            .join(search.output_stem(ordinal))
            .with_extension(options.format.extension());
        let run = RunOptions {
            headless: options.headless,
            use_store: options.use_store,
            output,
            format: options.format,
        };

        match run_search(config, &query, &run) {
            Ok(report) => {
                summary.searches_completed += 1;
                summary.postings += report.outcome.postings.len();
            }
            Err(error) => log::error!("Search {ordinal} failed: {error}"),
        }
    }

    log::info!(
        "Batch complete: {}/{} search(es), {} posting(s) total",
        summary.searches_completed,
        summary.searches_requested,
        summary.postings
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    #[test]
    fn parse_batch_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            [[searches]]
            keyword = "python developer"
            location = "Toronto, ON"
            pages = 3

            [[searches]]
            location = "Vancouver"
            "#
        )
        .unwrap();

        let batch = BatchFile::load(file.path()).unwrap();
        assert_eq!(batch.searches.len(), 2);
        assert_eq!(batch.searches[0].pages, 3);
        assert_eq!(batch.searches[1].keyword, "");
        assert_eq!(batch.searches[1].pages, 1);
    }

    #[test]
    fn reject_empty_batch() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "searches = []").unwrap();
        assert!(BatchFile::load(file.path()).is_err());
    }

    #[test]
    fn reject_entry_without_terms() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            [[searches]]
            pages = 2
            "#
        )
        .unwrap();
        assert!(BatchFile::load(file.path()).is_err());
    }

    #[test]
    fn output_stem_from_terms() {
        let search = BatchSearch {
            keyword: "python developer".to_string(),
            location: "Toronto, ON".to_string(),
            pages: 1,
        };
        assert_eq!(search.output_stem(1), "python_developer_Toronto_ON");

        let location_only = BatchSearch {
            keyword: String::new(),
            location: "Vancouver".to_string(),
            pages: 1,
        };
        assert_eq!(location_only.output_stem(2), "Vancouver");
    }
}
