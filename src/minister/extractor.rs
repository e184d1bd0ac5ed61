//! Extraction of price records from the embedded analytics payload.
//!
//! The shop renders its item list twice: once as HTML for humans and once
//! as a `gtag('event', 'view_item_list', {...})` call for Google Analytics.
//! The analytics call is far more stable than the markup, so prices and
//! brands are read from there. The payload is a JavaScript object literal,
//! not JSON, and needs some massaging before it can be decoded.

use crate::minister::models::PriceRecord;
use crate::minister::pricing::{apply_tax, PriceError};
use crate::minister::selectors::{ANALYTICS_SCRIPT, ITEMS_PATTERN, VIEW_ITEM_LIST_MARKER};
use regex_lite::RegexBuilder;
use scraper::Html;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, trace, warn};

#[derive(Debug, Error)]
enum ExtractError {
    #[error("invalid items pattern: {0}")]
    Pattern(#[from] regex_lite::Error),

    #[error("items pattern did not match the analytics script")]
    NoMatch,

    #[error("items payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("items payload is not an array")]
    NotAnArray,

    #[error("item {index} has no usable \"{field}\" field")]
    MissingField { index: usize, field: &'static str },

    #[error("item {index}: {source}")]
    Price {
        index: usize,
        #[source]
        source: PriceError,
    },
}

/// Extracts records using the shop's view-item-list marker and items pattern.
pub fn extract_prices(html: &str) -> Option<Vec<PriceRecord>> {
    extract(html, VIEW_ITEM_LIST_MARKER, ITEMS_PATTERN)
}

/// Extracts tax-adjusted price records from the first analytics script that
/// contains `marker`.
///
/// `pattern` must capture the item array literal in group 1. It is always
/// compiled with `.` matching newlines, since the payload is usually spread
/// over several lines. Only the first script containing the marker is
/// considered. Any failure yields `None`; partial results are never returned.
pub fn extract(html: &str, marker: &str, pattern: &str) -> Option<Vec<PriceRecord>> {
    if html.trim().is_empty() {
        warn!("Response was empty");
        return None;
    }

    let document = Html::parse_document(html);

    let Some(content) = document
        .select(&ANALYTICS_SCRIPT)
        .map(|script| script.text().collect::<String>())
        .find(|content| content.contains(marker))
    else {
        debug!("No analytics script contains the marker");
        return None;
    };

    match parse_items(&content, pattern) {
        Ok(records) => {
            debug!("Extracted {} price records", records.len());
            Some(records)
        }
        Err(e) => {
            warn!("There is a problem with the response formatting: {}", e);
            None
        }
    }
}

fn parse_items(content: &str, pattern: &str) -> Result<Vec<PriceRecord>, ExtractError> {
    let re = RegexBuilder::new(pattern).dot_matches_new_line(true).build()?;
    let raw = re
        .captures(content)
        .and_then(|caps| caps.get(1))
        .ok_or(ExtractError::NoMatch)?
        .as_str();
    trace!("Captured {} bytes of item payload", raw.len());

    let json = to_json(raw);
    let value: Value = serde_json::from_str(&json)?;
    let items = value.as_array().ok_or(ExtractError::NotAnArray)?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| parse_item(index, item))
        .collect()
}

/// Turns the single-quoted object literal into strict JSON.
///
/// Entities are decoded first (umlauts in brand names arrive as `&uuml;`).
/// Double quotes only appear as inch marks in sizes like `34"` and are
/// dropped before single quotes become the string delimiters.
fn to_json(raw: &str) -> String {
    html_escape::decode_html_entities(raw).replace('"', "").replace('\'', "\"")
}

fn parse_item(index: usize, item: &Value) -> Result<PriceRecord, ExtractError> {
    let raw_price = match item.get("price") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => return Err(ExtractError::MissingField { index, field: "price" }),
    };

    let brand = item
        .get("item_brand")
        .and_then(Value::as_str)
        .ok_or(ExtractError::MissingField { index, field: "item_brand" })?;

    let price = apply_tax(&raw_price).map_err(|source| ExtractError::Price { index, source })?;

    Ok(PriceRecord::new(price, brand))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn page(script: &str) -> String {
        format!(
            r#"<html><head>
                <script type="text/javascript" data-eucid="google_analytics4">{}</script>
            </head><body></body></html>"#,
            script
        )
    }

    #[test]
    fn test_extract_basic() {
        let html = page(
            "gtag('event', 'view_item_list', {\n\
             'items': [\n\
               {'item_name': 'Bat', 'price': '89', 'item_brand': 'Rawlings'},\n\
               {'item_name': 'Glove', 'price': '110', 'item_brand': 'Easton'}\n\
             ]\n\
             });",
        );

        let records = extract_prices(&html).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], PriceRecord::new(dec("105.91"), "Rawlings"));
        assert_eq!(records[1], PriceRecord::new(dec("130.90"), "Easton"));
    }

    #[test]
    fn test_extract_numeric_price() {
        let html = page("gtag('event', 'view_item_list', {'items': [{'price': 10, 'item_brand': 'Wilson'}]});");
        let records = extract_prices(&html).unwrap();
        assert_eq!(records[0].price(), dec("11.90"));
    }

    #[test]
    fn test_extract_decodes_entities() {
        let html = page(
            "gtag('event', 'view_item_list', {'items': [{'price': '10', 'item_brand': 'M&uuml;ller &amp; S&ouml;hne'}]});",
        );
        let records = extract_prices(&html).unwrap();
        assert_eq!(records[0].brand(), "Müller & Söhne");
    }

    #[test]
    fn test_extract_strips_inch_marks() {
        let html = page(
            "gtag('event', 'view_item_list', {'items': [{'item_name': 'Bat 34\" Alloy', 'price': '49', 'item_brand': 'Easton'}]});",
        );
        let records = extract_prices(&html).unwrap();
        assert_eq!(records[0], PriceRecord::new(dec("58.31"), "Easton"));
    }

    #[test]
    fn test_extract_empty_input() {
        assert!(extract_prices("").is_none());
    }

    #[test]
    fn test_extract_no_marker() {
        let html = page("gtag('event', 'page_view', {'items': [{'price': '10', 'item_brand': 'A'}]});");
        assert!(extract_prices(&html).is_none());
    }

    #[test]
    fn test_extract_malformed_payload() {
        let html = page("gtag('event', 'view_item_list', {'items': [{'price': '10', 'item_brand': }]});");
        assert!(extract_prices(&html).is_none());
    }

    #[test]
    fn test_extract_missing_field_rejects_everything() {
        let html = page(
            "gtag('event', 'view_item_list', {'items': [\
               {'price': '10', 'item_brand': 'A'},\
               {'price': '12'}\
             ]});",
        );
        assert!(extract_prices(&html).is_none());
    }

    #[test]
    fn test_extract_invalid_price_rejects_everything() {
        let html = page(
            "gtag('event', 'view_item_list', {'items': [{'price': 'n/a', 'item_brand': 'A'}]});",
        );
        assert!(extract_prices(&html).is_none());
    }

    #[test]
    fn test_first_matching_script_wins() {
        let html = r#"<html><head>
            <script type="text/javascript" data-eucid="google_analytics4">
                gtag('event', 'view_item_list', {'items': [{'price': '10', 'item_brand': 'First'}]});
            </script>
            <script type="text/javascript" data-eucid="google_analytics4">
                gtag('event', 'view_item_list', {'items': [{'price': '20', 'item_brand': 'Second'}]});
            </script>
        </head></html>"#;

        let records = extract_prices(html).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].brand(), "First");
    }

    #[test]
    fn test_first_marker_script_without_items_stops_scan() {
        let html = r#"<html><head>
            <script type="text/javascript" data-eucid="google_analytics4">
                gtag('event', 'view_item_list', {'item_list_name': 'Suche'});
            </script>
            <script type="text/javascript" data-eucid="google_analytics4">
                gtag('event', 'view_item_list', {'items': [{'price': '20', 'item_brand': 'Second'}]});
            </script>
        </head></html>"#;

        assert!(extract_prices(html).is_none());
    }

    #[test]
    fn test_extract_custom_marker_and_pattern() {
        let html = page("track('list', {'products': [{'price': '1', 'item_brand': 'X'}]});");
        let records = extract(&html, "track('list'", r"'products':\s*(\[.*?\])").unwrap();
        assert_eq!(records[0].price(), dec("1.19"));
    }

    #[test]
    fn test_extract_plain_pattern_spans_lines() {
        let html = page(
            "gtag('event', 'view_item_list', {'items': [\n\
               {'price': '10', 'item_brand': 'Wilson'},\n\
               {'price': '20', 'item_brand': 'Easton'}\n\
             ]});",
        );
        let records = extract(&html, VIEW_ITEM_LIST_MARKER, r"'items':\s*(\[.*?\])").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1], PriceRecord::new(dec("23.80"), "Easton"));
    }

    #[test]
    fn test_extract_invalid_pattern() {
        let html = page("gtag('event', 'view_item_list', {'items': []});");
        assert!(extract(&html, VIEW_ITEM_LIST_MARKER, "(unclosed").is_none());
    }

    #[test]
    fn test_extract_empty_items() {
        let html = page("gtag('event', 'view_item_list', {'items': []});");
        assert_eq!(extract_prices(&html), Some(Vec::new()));
    }

    #[test]
    fn test_extract_is_idempotent() {
        let html = page(
            "gtag('event', 'view_item_list', {'items': [{'price': '84.87', 'item_brand': 'Marucci'}]});",
        );
        let first = extract_prices(&html);
        let second = extract_prices(&html);
        assert!(first.is_some());
        assert_eq!(first, second);
        assert_eq!(first.unwrap()[0].price().to_string(), "101.00");
    }
}
