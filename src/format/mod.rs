//! Output formatting for scrape results (table, JSON, CSV).

use crate::config::OutputFormat;
use crate::minister::{PriceRecord, PriceStatistics, ScrapeResult, ScrapeStatus};
use serde::Serialize;

/// Formats scrape results.
pub struct Formatter {
    format: OutputFormat,
    include_records: bool,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    category: &'a str,
    status: ScrapeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    statistics: Option<&'a PriceStatistics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    records: Option<&'a [PriceRecord]>,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format, include_records: false }
    }

    /// Also render the individual records, not just the statistics.
    pub fn with_records(mut self, include_records: bool) -> Self {
        self.include_records = include_records;
        self
    }

    /// Formats the outcome of scraping `category`.
    pub fn format_result(&self, category: &str, result: &ScrapeResult) -> String {
        match self.format {
            OutputFormat::Json => self.json(category, result),
            OutputFormat::Table => self.table(category, result),
            OutputFormat::Csv => self.csv(category, result),
        }
    }

    /// Human readable explanation for a failed scrape.
    pub fn failure_message(category: &str, status: ScrapeStatus) -> String {
        match status {
            ScrapeStatus::NotFound => {
                format!("Unfortunately we could not find prices for this category: {}", category)
            }
            _ => format!(
                "An unexpected error happened while trying to scrape baseballminister.de ({})",
                status
            ),
        }
    }

    // JSON formatting

    fn json(&self, category: &str, result: &ScrapeResult) -> String {
        let output = JsonOutput {
            category,
            status: result.status(),
            statistics: result.statistics(),
            records: self.include_records.then(|| result.records()),
        };
        serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
    }

    // Table formatting

    fn table(&self, category: &str, result: &ScrapeResult) -> String {
        let stats = match (result.status(), result.statistics()) {
            (ScrapeStatus::ValidPrices, Some(stats)) => stats,
            (status, _) => return Self::failure_message(category, status),
        };

        let mut lines = vec![
            format!("Category:     {}", category),
            format!("Total count:  {}", stats.total_count),
            format!("Avg price:    {}", stats.avg_price),
            format!("Max price:    {}", stats.max_price),
            format!("Min price:    {}", stats.min_price),
        ];

        if self.include_records {
            let price_width = 10;
            let brand_width = 30;

            lines.push(String::new());
            lines.push(format!("{:>price_width$}  {}", "Price", "Brand"));
            lines.push(format!("{:-<price_width$}  {:-<brand_width$}", "", ""));

            for record in result.records() {
                let price = record.price().to_string();
                lines.push(format!("{:>price_width$}  {}", price, record.brand()));
            }
        }

        lines.join("\n")
    }

    // CSV formatting

    fn csv(&self, category: &str, result: &ScrapeResult) -> String {
        let stats = match (result.status(), result.statistics()) {
            (ScrapeStatus::ValidPrices, Some(stats)) => stats,
            (status, _) => return Self::failure_message(category, status),
        };

        let mut lines = Vec::new();

        if self.include_records {
            lines.push("price,brand".to_string());
            for record in result.records() {
                lines.push(format!("{},{}", record.price(), Self::csv_escape(record.brand())));
            }
        } else {
            lines.push("total_count,avg_price,max_price,min_price".to_string());
            lines.push(format!(
                "{},{},{},{}",
                stats.total_count, stats.avg_price, stats.max_price, stats.min_price
            ));
        }

        lines.join("\n")
    }

    fn csv_escape(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }
}
