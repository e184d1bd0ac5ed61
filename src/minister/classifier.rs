//! Heuristic classification of search page responses.

use crate::minister::selectors::{
    ALERT, ANALYTICS_SCRIPT, NO_RESULTS_CLASS, NO_RESULTS_MESSAGE, VIEW_ITEM_LIST_MARKER,
};
use scraper::Html;
use tracing::trace;

/// What a fetched search page turned out to contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// Item list analytics payload present and no empty-search alert.
    Prices,
    /// The shop reported that nothing matched the search.
    NoResults,
    /// Neither; usually a blocked, truncated or redesigned page.
    Unrecognized,
}

/// Classifies a page, parsing the document once.
pub fn classify(html: &str) -> PageKind {
    if html.trim().is_empty() {
        return PageKind::Unrecognized;
    }

    let document = Html::parse_document(html);
    if document_has_no_results(&document) {
        PageKind::NoResults
    } else if document_has_marker(&document) {
        PageKind::Prices
    } else {
        PageKind::Unrecognized
    }
}

/// Returns true if an analytics script carries the item list marker and
/// the page is not an empty-search page.
pub fn has_valid_prices(html: &str) -> bool {
    classify(html) == PageKind::Prices
}

/// Returns true if the empty-search alert with the expected message is present.
pub fn is_no_results(html: &str) -> bool {
    if html.trim().is_empty() {
        return false;
    }
    document_has_no_results(&Html::parse_document(html))
}

fn document_has_marker(document: &Html) -> bool {
    document.select(&ANALYTICS_SCRIPT).any(|script| {
        let content = script.text().collect::<String>();
        trace!("Analytics script with {} bytes", content.len());
        content.contains(VIEW_ITEM_LIST_MARKER)
    })
}

fn document_has_no_results(document: &Html) -> bool {
    // Only the first alert box counts
    let Some(alert) = document
        .select(&ALERT)
        .find(|e| e.value().attr("class") == Some(NO_RESULTS_CLASS))
    else {
        return false;
    };

    let text: String = alert.text().map(str::trim).collect();
    text.contains(NO_RESULTS_MESSAGE)
}
