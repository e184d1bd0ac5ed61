//! Data models for scraped prices, summary statistics, and scrape outcomes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single tax-adjusted price and the brand it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRecord {
    price: Decimal,
    brand: String,
}

impl PriceRecord {
    /// Creates a record from an already normalized price.
    pub fn new(price: Decimal, brand: impl Into<String>) -> Self {
        Self { price, brand: brand.into() }
    }

    /// Gross price including tax.
    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }
}

/// Aggregates over the prices of one scrape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceStatistics {
    pub total_count: usize,
    pub avg_price: Decimal,
    pub max_price: Decimal,
    pub min_price: Decimal,
}

impl PriceStatistics {
    /// Computes statistics over the records, or `None` when there are none
    /// or their sum does not fit in a [`Decimal`].
    ///
    /// The average is rounded to cents; min and max are taken as-is.
    pub fn from_records(records: &[PriceRecord]) -> Option<Self> {
        let max_price = records.iter().map(PriceRecord::price).max()?;
        let min_price = records.iter().map(PriceRecord::price).min()?;

        let total_count = records.len();
        let sum = records
            .iter()
            .map(PriceRecord::price)
            .try_fold(Decimal::ZERO, |acc, price| acc.checked_add(price))?;
        let avg_price = sum.checked_div(Decimal::from(total_count))?.round_dp(2);

        Some(Self { total_count, avg_price, max_price, min_price })
    }
}

/// Outcome of a scrape. Callers branch on this, never on data presence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScrapeStatus {
    ValidPrices,
    NotFound,
    RequestError,
    ParsingError,
    TooManyRequestsError,
    ServerError,
    #[default]
    OtherError,
}

impl ScrapeStatus {
    /// Returns true only for [`ScrapeStatus::ValidPrices`].
    pub fn is_success(&self) -> bool {
        matches!(self, ScrapeStatus::ValidPrices)
    }
}

impl fmt::Display for ScrapeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScrapeStatus::ValidPrices => "VALID_PRICES",
            ScrapeStatus::NotFound => "NOT_FOUND",
            ScrapeStatus::RequestError => "REQUEST_ERROR",
            ScrapeStatus::ParsingError => "PARSING_ERROR",
            ScrapeStatus::TooManyRequestsError => "TOO_MANY_REQUESTS_ERROR",
            ScrapeStatus::ServerError => "SERVER_ERROR",
            ScrapeStatus::OtherError => "OTHER_ERROR",
        };
        f.write_str(name)
    }
}

/// Records, statistics and status of one `get_prices` call.
///
/// Records and statistics are populated if and only if the status is
/// [`ScrapeStatus::ValidPrices`]; the constructors are the only way to
/// build a result, so the pairing always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrapeResult {
    records: Vec<PriceRecord>,
    statistics: Option<PriceStatistics>,
    status: ScrapeStatus,
}

impl ScrapeResult {
    /// Builds a successful result. An empty record set has no statistics
    /// and is reported as a parsing error instead.
    pub fn valid(records: Vec<PriceRecord>) -> Self {
        match PriceStatistics::from_records(&records) {
            Some(statistics) => Self {
                records,
                statistics: Some(statistics),
                status: ScrapeStatus::ValidPrices,
            },
            None => Self::failed(ScrapeStatus::ParsingError),
        }
    }

    /// Builds a result carrying no data.
    pub fn failed(status: ScrapeStatus) -> Self {
        let status = if status.is_success() { ScrapeStatus::OtherError } else { status };
        Self { records: Vec::new(), statistics: None, status }
    }

    pub fn records(&self) -> &[PriceRecord] {
        &self.records
    }

    pub fn statistics(&self) -> Option<&PriceStatistics> {
        self.statistics.as_ref()
    }

    pub fn status(&self) -> ScrapeStatus {
        self.status
    }

    /// Splits the result into its parts.
    pub fn into_parts(self) -> (Vec<PriceRecord>, Option<PriceStatistics>, ScrapeStatus) {
        (self.records, self.statistics, self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_records() -> Vec<PriceRecord> {
        vec![
            PriceRecord::new(dec("105.91"), "Rawlings"),
            PriceRecord::new(dec("130.90"), "Easton"),
            PriceRecord::new(dec("58.31"), "Easton"),
        ]
    }

    #[test]
    fn test_statistics_from_records() {
        let stats = PriceStatistics::from_records(&make_records()).unwrap();
        assert_eq!(stats.total_count, 3);
        // (105.91 + 130.90 + 58.31) / 3 = 98.3733...
        assert_eq!(stats.avg_price, dec("98.37"));
        assert_eq!(stats.max_price, dec("130.90"));
        assert_eq!(stats.min_price, dec("58.31"));
    }

    #[test]
    fn test_statistics_empty() {
        assert!(PriceStatistics::from_records(&[]).is_none());
    }

    #[test]
    fn test_statistics_single_record() {
        let records = vec![PriceRecord::new(dec("11.90"), "Wilson")];
        let stats = PriceStatistics::from_records(&records).unwrap();
        assert_eq!(stats.total_count, 1);
        assert_eq!(stats.avg_price, dec("11.90"));
        assert_eq!(stats.max_price, stats.min_price);
    }

    #[test]
    fn test_average_uses_bankers_rounding() {
        // 0.125 sits exactly on the midpoint and rounds to the even cent
        let records = vec![PriceRecord::new(dec("0.12"), "A"), PriceRecord::new(dec("0.13"), "B")];
        let stats = PriceStatistics::from_records(&records).unwrap();
        assert_eq!(stats.avg_price, dec("0.12"));
    }

    #[test]
    fn test_statistics_sum_overflow() {
        let huge = dec("71400000000000000000000000000");
        let records = vec![PriceRecord::new(huge, "A"), PriceRecord::new(huge, "B")];
        assert!(PriceStatistics::from_records(&records).is_none());

        let result = ScrapeResult::valid(records);
        assert_eq!(result.status(), ScrapeStatus::ParsingError);
        assert!(result.records().is_empty());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(ScrapeStatus::ValidPrices.to_string(), "VALID_PRICES");
        assert_eq!(ScrapeStatus::TooManyRequestsError.to_string(), "TOO_MANY_REQUESTS_ERROR");
        assert_eq!(ScrapeStatus::default(), ScrapeStatus::OtherError);
    }

    #[test]
    fn test_status_serde() {
        let json = serde_json::to_string(&ScrapeStatus::NotFound).unwrap();
        assert_eq!(json, "\"NOT_FOUND\"");
    }

    #[test]
    fn test_valid_result_has_data() {
        let result = ScrapeResult::valid(make_records());
        assert_eq!(result.status(), ScrapeStatus::ValidPrices);
        assert_eq!(result.records().len(), 3);
        assert!(result.statistics().is_some());
    }

    #[test]
    fn test_valid_result_without_records_is_parsing_error() {
        let result = ScrapeResult::valid(Vec::new());
        assert_eq!(result.status(), ScrapeStatus::ParsingError);
        assert!(result.records().is_empty());
        assert!(result.statistics().is_none());
    }

    #[test]
    fn test_failed_result_is_empty() {
        let (records, stats, status) = ScrapeResult::failed(ScrapeStatus::NotFound).into_parts();
        assert!(records.is_empty());
        assert!(stats.is_none());
        assert_eq!(status, ScrapeStatus::NotFound);
    }

    #[test]
    fn test_failed_never_reports_success() {
        let result = ScrapeResult::failed(ScrapeStatus::ValidPrices);
        assert_eq!(result.status(), ScrapeStatus::OtherError);
    }

    #[test]
    fn test_record_serializes_price_as_string() {
        let record = PriceRecord::new(dec("11.90"), "Easton");
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"price":"11.90","brand":"Easton"}"#);
    }
}
