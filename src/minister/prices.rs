//! Price scraping for one search category.

use crate::config::Config;
use crate::error::FetchError;
use crate::minister::client::{MinisterClient, PageFetcher};
use crate::minister::extractor::extract_prices;
use crate::minister::models::{ScrapeResult, ScrapeStatus};
use crate::minister::retry::{RetryController, RetryPolicy};
use tracing::{info, warn};

/// Fetches a category search page and summarizes its prices.
pub struct PriceScraper {
    fetcher: Box<dyn PageFetcher>,
    base_url: String,
    policy: RetryPolicy,
}

impl PriceScraper {
    /// Creates a scraper backed by the shop HTTP client.
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let client = MinisterClient::new(config)?;
        Ok(Self::with_fetcher(config, client))
    }

    /// Creates a scraper with a provided fetcher (for testing).
    pub fn with_fetcher(config: &Config, fetcher: impl PageFetcher + 'static) -> Self {
        Self {
            fetcher: Box::new(fetcher),
            base_url: config.base_url.clone(),
            policy: RetryPolicy::from_config(config),
        }
    }

    /// Search URL for a category. The category is appended as given.
    pub fn url_for(&self, category: &str) -> String {
        format!("{}{}", self.base_url, category)
    }

    /// Scrapes the category and returns records, statistics and status.
    ///
    /// Never fails: every problem is reported through the status.
    pub async fn get_prices(&self, category: &str) -> ScrapeResult {
        let url = self.url_for(category);
        info!("Scraping data for {}", url);

        let controller = RetryController::new(self.fetcher.as_ref(), self.policy.clone());
        let (html, status) = controller.fetch(&url).await;

        let html = match (html, status) {
            (Some(html), ScrapeStatus::ValidPrices) => html,
            (_, status) => return ScrapeResult::failed(status),
        };

        let Some(records) = extract_prices(&html) else {
            return ScrapeResult::failed(ScrapeStatus::ParsingError);
        };

        let result = ScrapeResult::valid(records);
        if !result.status().is_success() {
            warn!("No statistics for {}: item list empty or prices out of range", url);
        }
        result
    }
}
