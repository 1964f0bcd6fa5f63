// src/services/mod.rs

//! Scraping services: browser session, pagination, extraction, search.

pub mod browser;
pub mod extract;
pub mod navigate;
pub mod search;

pub use browser::BrowserSession;
pub use extract::Extractor;
pub use navigate::{PageFetcher, SearchPager, build_search_url};
pub use search::{JobSearch, SearchOutcome, SearchQuery};
