//! Prices command implementation.

use crate::config::Config;
use crate::format::Formatter;
use crate::minister::PriceScraper;
use anyhow::{Context, Result};
use tracing::{info, warn};

/// Scrapes one category and renders the outcome.
pub struct PricesCommand {
    config: Config,
    include_records: bool,
}

impl PricesCommand {
    /// Creates a new prices command.
    pub fn new(config: Config) -> Self {
        Self { config, include_records: false }
    }

    /// Also print every scraped record.
    pub fn with_records(mut self, include_records: bool) -> Self {
        self.include_records = include_records;
        self
    }

    /// Executes the scrape and returns formatted output.
    pub async fn execute(&self, category: &str) -> Result<String> {
        let scraper = PriceScraper::new(&self.config).context("Failed to create HTTP client")?;
        Ok(self.execute_with_scraper(&scraper, category).await)
    }

    /// Executes the scrape with a provided scraper (for testing).
    pub async fn execute_with_scraper(&self, scraper: &PriceScraper, category: &str) -> String {
        let result = scraper.get_prices(category).await;

        if result.status().is_success() {
            info!("Scraped {} prices for {}", result.records().len(), category);
        } else {
            warn!("Scraping {} finished with {}", category, result.status());
        }

        Formatter::new(self.config.format)
            .with_records(self.include_records)
            .format_result(category, &result)
    }
}
