// src/services/browser.rs

//! Browser session management.
//!
//! One Chrome session drives the whole search: the target renders its
//! listings with JavaScript, so pages are fetched through the browser
//! rather than with a plain HTTP client.

use std::sync::Arc;
use std::time::Duration;

use headless_chrome::{Browser, LaunchOptionsBuilder, Tab};
use rand::seq::SliceRandom;

use crate::error::{AppError, Result};
use crate::models::ScraperConfig;
use crate::services::extract::LISTING_SELECTOR;

/// A single anonymous browsing session over one tab.
pub struct BrowserSession {
    // The tab dies with the browser process; keep the browser alive as
    // long as the session.
    _browser: Browser,
    tab: Arc<Tab>,
    settle_timeout: Duration,
}

impl BrowserSession {
    /// Launch the browser and open one tab.
    ///
    /// Fails with [`AppError::Browser`] when the Chrome runtime is missing
    /// or cannot start; that is fatal and not retried.
    pub fn launch(config: &ScraperConfig, headless: bool) -> Result<Self> {
        log::info!(
            "Starting browser ({})",
            if headless { "headless" } else { "visible" }
        );

        let options = LaunchOptionsBuilder::default()
            .headless(headless)
            .window_size(Some((1920, 1080)))
            // Inter-page delays must not trip the idle shutdown.
            .idle_browser_timeout(Duration::from_secs(300))
            .build()
            .map_err(AppError::browser)?;

        let browser = Browser::new(options).map_err(AppError::browser)?;
        let tab = browser.new_tab().map_err(AppError::browser)?;
        tab.set_default_timeout(Duration::from_secs(config.timeout_secs));

        if let Some(user_agent) = config.user_agents.choose(&mut rand::thread_rng()) {
            tab.set_user_agent(user_agent, None, None)
                .map_err(AppError::browser)?;
        }

        Ok(Self {
            _browser: browser,
            tab,
            settle_timeout: Duration::from_secs(config.settle_timeout_secs),
        })
    }

    /// Navigate to a URL and return the rendered DOM.
    ///
    /// Waits for navigation to complete, then gives the listings a bounded
    /// settle window. A page that loads but never shows a listing is still
    /// returned; the caller decides what an empty page means. Navigation
    /// failures are recoverable per-page errors.
    pub fn rendered_html(&self, url: &str) -> Result<String> {
        self.tab
            .navigate_to(url)
            .map_err(|e| AppError::navigation(url, e))?;
        self.tab
            .wait_until_navigated()
            .map_err(|e| AppError::navigation(url, e))?;

        if let Err(e) = self
            .tab
            .wait_for_element_with_custom_timeout(LISTING_SELECTOR, self.settle_timeout)
        {
            log::debug!("No listings rendered on {url}: {e}");
        }

        self.tab
            .get_content()
            .map_err(|e| AppError::navigation(url, e))
    }
}
