//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Browser and pagination behavior settings
    #[serde(default)]
    pub scraper: ScraperConfig,

    /// Target site structure
    #[serde(default)]
    pub site: SiteConfig,

    /// Persisted job store settings
    #[serde(default)]
    pub store: StoreConfig,

    /// File export settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Text preprocessing settings
    #[serde(default)]
    pub cleaning: CleaningConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        if !path.as_ref().exists() {
            return Self::default();
        }
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.scraper.user_agents.is_empty() {
            return Err(AppError::config("scraper.user_agents is empty"));
        }
        if self.scraper.user_agents.iter().any(|ua| ua.trim().is_empty()) {
            return Err(AppError::config("scraper.user_agents contains a blank entry"));
        }
        if self.scraper.timeout_secs == 0 {
            return Err(AppError::config("scraper.timeout_secs must be > 0"));
        }
        if self.scraper.settle_timeout_secs == 0 {
            return Err(AppError::config("scraper.settle_timeout_secs must be > 0"));
        }
        if self.scraper.max_retries == 0 {
            return Err(AppError::config("scraper.max_retries must be > 0"));
        }
        url::Url::parse(&self.site.base_url)
            .map_err(|e| AppError::config(format!("site.base_url is invalid: {e}")))?;
        if !self.site.search_path.starts_with('/') {
            return Err(AppError::config("site.search_path must start with '/'"));
        }
        Ok(())
    }
}

/// Browser session and pagination behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// User-Agent pool; one is picked at random per session
    #[serde(default = "defaults::user_agents")]
    pub user_agents: Vec<String>,

    /// Page load timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// How long to wait for listings to render before treating a page as empty
    #[serde(default = "defaults::settle_timeout")]
    pub settle_timeout_secs: u64,

    /// Fixed delay between page requests in seconds
    #[serde(default = "defaults::page_delay")]
    pub page_delay_secs: u64,

    /// Attempts per page before giving up on it
    #[serde(default = "defaults::max_retries")]
    pub max_retries: u32,

    /// Run the browser without a visible window
    #[serde(default = "defaults::headless")]
    pub headless: bool,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            user_agents: defaults::user_agents(),
            timeout_secs: defaults::timeout(),
            settle_timeout_secs: defaults::settle_timeout(),
            page_delay_secs: defaults::page_delay(),
            max_retries: defaults::max_retries(),
            headless: defaults::headless(),
        }
    }
}

/// Fixed structure of the target site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site root, also used to resolve relative posting links
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Search endpoint path under the site root
    #[serde(default = "defaults::search_path")]
    pub search_path: String,

    /// Result ordering parameter ("D" = date posted, newest first)
    #[serde(default = "defaults::sort")]
    pub sort: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            search_path: defaults::search_path(),
            sort: defaults::sort(),
        }
    }
}

/// Persisted job store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite database file location
    #[serde(default = "defaults::store_path")]
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: defaults::store_path(),
        }
    }
}

/// File export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory for generated export files
    #[serde(default = "defaults::output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: defaults::output_dir(),
        }
    }
}

/// Text cleaning/preprocessing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningConfig {
    /// Field labels the site prepends to values ("Location Toronto (ON)")
    #[serde(default = "defaults::strip_label_prefixes")]
    pub strip_label_prefixes: Vec<String>,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            strip_label_prefixes: defaults::strip_label_prefixes(),
        }
    }
}

impl CleaningConfig {
    /// Normalize whitespace and strip leading field labels.
    pub fn clean(&self, text: &str) -> String {
        let mut result = text.split_whitespace().collect::<Vec<_>>().join(" ");

        for prefix in &self.strip_label_prefixes {
            if let Some(rest) = result
                .strip_prefix(prefix.as_str())
                .and_then(|rest| rest.strip_prefix(' '))
            {
                result = rest.to_string();
            }
        }

        result.trim().to_string()
    }
}

mod defaults {
    use std::path::PathBuf;

    // Scraper defaults
    pub fn user_agents() -> Vec<String> {
        vec![
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".into(),
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".into(),
            "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".into(),
        ]
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn settle_timeout() -> u64 {
        10
    }
    pub fn page_delay() -> u64 {
        2
    }
    pub fn max_retries() -> u32 {
        3
    }
    pub fn headless() -> bool {
        true
    }

    // Site defaults
    pub fn base_url() -> String {
        "https://www.jobbank.gc.ca".into()
    }
    pub fn search_path() -> String {
        "/jobsearch/jobsearch".into()
    }
    pub fn sort() -> String {
        "D".into()
    }

    // Store/output defaults
    pub fn store_path() -> PathBuf {
        PathBuf::from("data/jobbank.db")
    }
    pub fn output_dir() -> PathBuf {
        PathBuf::from("data")
    }

    // Cleaning defaults
    pub fn strip_label_prefixes() -> Vec<String> {
        vec!["Location".into(), "Salary".into(), "Employer".into()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agents() {
        let mut config = Config::default();
        config.scraper.user_agents.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_retries() {
        let mut config = Config::default();
        config.scraper.max_retries = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_base_url() {
        let mut config = Config::default();
        config.site.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn parse_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [scraper]
            page_delay_secs = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.scraper.page_delay_secs, 5);
        assert_eq!(config.scraper.max_retries, 3);
        assert_eq!(config.site.base_url, "https://www.jobbank.gc.ca");
    }

    #[test]
    fn clean_normalizes_whitespace() {
        let cleaning = CleaningConfig::default();
        assert_eq!(cleaning.clean("  software \n developer "), "software developer");
    }

    #[test]
    fn clean_strips_field_labels() {
        let cleaning = CleaningConfig::default();
        assert_eq!(cleaning.clean("Location Toronto (ON)"), "Toronto (ON)");
        assert_eq!(cleaning.clean("Salary $45.00 hourly"), "$45.00 hourly");
        // Only whole leading labels are stripped.
        assert_eq!(cleaning.clean("Locations vary"), "Locations vary");
    }
}
