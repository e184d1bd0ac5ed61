//! baseball-prices - Price statistics for baseballminister.de searches
//!
//! Reads the Google Analytics item list embedded in a search page, adds
//! VAT to every price and summarizes the result.

pub mod commands;
pub mod config;
pub mod error;
pub mod format;
pub mod minister;

pub use config::Config;
pub use error::FetchError;
pub use minister::models::{PriceRecord, PriceStatistics, ScrapeResult, ScrapeStatus};
pub use minister::PriceScraper;
