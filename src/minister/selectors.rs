//! CSS selectors and literal markers for baseballminister.de pages.
//!
//! This file contains every site-specific string used for classifying and
//! parsing search pages. Update it when the shop changes its templates.
//!
//! **Update process**: When classification or extraction fails, capture an
//! HTML sample, update the constants, and add a test fixture.

use scraper::Selector;
use std::sync::LazyLock;

/// Search endpoint; the category is appended verbatim.
pub const BASE_URL: &str = "https://www.baseballminister.de/search/?qs=";

/// Google Analytics 4 script blocks injected by the shop's consent manager.
pub static ANALYTICS_SCRIPT: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"script[type="text/javascript"][data-eucid="google_analytics4"]"#).unwrap()
});

/// Substring identifying the script that carries the listed items.
pub const VIEW_ITEM_LIST_MARKER: &str = "gtag('event', 'view_item_list'";

/// Captures the JavaScript array literal assigned to `'items'`. The
/// extractor compiles it with `.` matching newlines.
pub const ITEMS_PATTERN: &str = r"'items':\s*(\[.*?\])";

/// Class attribute of the alert box shown for empty searches.
pub const NO_RESULTS_CLASS: &str = "alert alert-info";

/// Message rendered inside the alert box when a search has no hits.
pub const NO_RESULTS_MESSAGE: &str = "Leider wurde zu Deinem Suchbegriff nichts gefunden";

/// Alert containers. The class attribute is compared verbatim by the
/// classifier, so this only narrows the search to divs.
pub static ALERT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div[class]").unwrap());
