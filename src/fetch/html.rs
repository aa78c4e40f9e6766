// src/fetch/html.rs
// =============================================================================
// This module extracts raw anchor hrefs from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever, so broken real-world markup still parses
//
// Nothing is validated or resolved here. Every <a> element contributes
// exactly one string, in document order; an <a> without an href becomes "".
// Normalization (and rejecting the junk) is the crawler's job.
// =============================================================================

use scraper::{Html, Selector};

// Extracts the href of every <a> element
//
// Example:
//   html   = "<a href=' /docs '>Docs</a><a name='top'></a>"
//   result = [" /docs ", ""]
pub fn extract_anchors(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    // Constant selector, known to be valid
    let selector = Selector::parse("a").unwrap();

    document
        .select(&selector)
        .map(|element| element.value().attr("href").unwrap_or_default().to_string())
        .collect()
}
