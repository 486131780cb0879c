// src/extract/links.rs

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

static LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").expect("link selector"));

/// Label of the link that serves an investment's Business Case PDF.
pub const BUSINESS_CASE_LABEL: &str = "Download Business Case PDF";

/// First link whose text mentions `agency`, resolved against `base`.
pub fn agency_link(markup: &str, agency: &str, base: &Url) -> Option<Url> {
    let doc = Html::parse_document(markup);
    doc.select(&LINK)
        .filter(|el| el.text().collect::<String>().contains(agency))
        .filter_map(|el| el.value().attr("href"))
        .find_map(|href| base.join(href).ok())
}

/// Every distinct link inside the investments table, in document order.
pub fn investment_links(table_markup: &str, base: &Url) -> Vec<Url> {
    let fragment = Html::parse_fragment(table_markup);
    let mut seen = HashSet::new();
    fragment
        .select(&LINK)
        .filter_map(|el| el.value().attr("href"))
        .filter_map(|href| base.join(href).ok())
        .filter(|url| seen.insert(url.to_string()))
        .collect()
}

/// The Business Case PDF link on an investment page.
pub fn business_case_link(markup: &str, base: &Url) -> Option<Url> {
    let doc = Html::parse_document(markup);
    doc.select(&LINK)
        .filter(|el| el.text().collect::<String>().trim() == BUSINESS_CASE_LABEL)
        .filter_map(|el| el.value().attr("href"))
        .find_map(|href| base.join(href).ok())
}

/// File stem a document link is saved under: its last path segment.
pub fn document_stem(url: &Url) -> Option<String> {
    url.path_segments()?
        .filter(|segment| !segment.is_empty())
        .last()
        .map(|segment| segment.trim_end_matches('\'').to_string())
        .filter(|stem| !stem.is_empty())
}
