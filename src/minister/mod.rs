//! baseballminister.de specific modules for fetching, classification and extraction.

pub mod classifier;
pub mod client;
pub mod extractor;
pub mod models;
pub mod prices;
pub mod pricing;
pub mod retry;
pub mod selectors;

pub use classifier::{classify, has_valid_prices, is_no_results, PageKind};
pub use client::{MinisterClient, PageFetcher};
pub use extractor::{extract, extract_prices};
pub use models::{PriceRecord, PriceStatistics, ScrapeResult, ScrapeStatus};
pub use prices::PriceScraper;
pub use pricing::apply_tax;
pub use retry::{RetryController, RetryPolicy};
