// src/extract/table.rs

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument, warn};

use crate::error::TableError;

static INVESTMENTS_TABLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("#investments-table-object").expect("table id selector"));
static THEAD: Lazy<Selector> = Lazy::new(|| Selector::parse("thead").expect("thead selector"));
static TBODY: Lazy<Selector> = Lazy::new(|| Selector::parse("tbody").expect("tbody selector"));
static HEADER_CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("th").expect("th selector"));
static SIZING_LABEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.dataTables_sizing").expect("sizing label selector"));
static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("tr selector"));
static CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td").expect("td selector"));

// The HTML5 tree builder inserts a missing <tbody> and drops table parts
// outside a <table>, so both are checked against the raw markup.
static TABLE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<table[\s/>]").expect("table tag regex"));
static TBODY_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<tbody[\s/>]").expect("tbody tag regex"));

/// One row of an agency's investments table.
///
/// Fields are kept as `(column, value)` pairs in header order, so iteration
/// order is the column order of the source table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvestmentRecord {
    fields: Vec<(String, String)>,
}

impl InvestmentRecord {
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Value of the first column named `column`.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(_, value)| value.as_str())
    }

    pub fn contains_value(&self, needle: &str) -> bool {
        self.values().any(|value| value == needle)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Headers discovered from `<thead>` plus every well-formed body row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InvestmentTable {
    pub headers: Vec<String>,
    pub records: Vec<InvestmentRecord>,
}

impl InvestmentTable {
    /// First header containing any of `needles`, compared case-insensitively.
    pub fn find_column(&self, needles: &[&str]) -> Option<&str> {
        self.headers
            .iter()
            .find(|header| {
                let header = header.to_lowercase();
                needles
                    .iter()
                    .any(|needle| header.contains(&needle.to_lowercase()))
            })
            .map(String::as_str)
    }

    /// Column holding the Unique Investment Identifier.
    pub fn identifier_column(&self) -> Option<&str> {
        self.find_column(&["UII", "Unique Investment Identifier"])
    }

    /// Column holding the investment title.
    pub fn title_column(&self) -> Option<&str> {
        self.find_column(&["Investment Title", "Title"])
    }

    /// Records as plain rows in header order, for the spreadsheet sink.
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.records
            .iter()
            .map(|r| r.values().map(str::to_string).collect())
            .collect()
    }
}

/// Outer HTML of the investments table inside a full agency page.
pub fn table_markup(page: &str) -> Result<String, TableError> {
    let doc = Html::parse_document(page);
    doc.select(&INVESTMENTS_TABLE)
        .next()
        .map(|table| table.html())
        .ok_or(TableError::MalformedTable {
            missing: "#investments-table-object",
        })
}

/// Turn investments table markup into ordered records.
pub fn extract(markup: &str) -> Result<Vec<InvestmentRecord>, TableError> {
    extract_table(markup).map(|table| table.records)
}

/// Like [`extract`], but keeps the discovered header row.
#[instrument(level = "debug", skip(markup), fields(markup_len = markup.len()))]
pub fn extract_table(markup: &str) -> Result<InvestmentTable, TableError> {
    let fragment = if TABLE_TAG.is_match(markup) {
        Html::parse_fragment(markup)
    } else {
        Html::parse_fragment(&format!("<table>{}</table>", markup))
    };

    let thead = fragment
        .select(&THEAD)
        .next()
        .ok_or(TableError::MalformedTable { missing: "<thead>" })?;
    let tbody = fragment
        .select(&TBODY)
        .next()
        .filter(|_| TBODY_TAG.is_match(markup))
        .ok_or(TableError::MalformedTable { missing: "<tbody>" })?;

    let headers: Vec<String> = thead.select(&HEADER_CELL).map(header_text).collect();
    debug!(columns = headers.len(), ?headers, "discovered headers");

    let mut records = Vec::new();
    for (row_idx, row) in tbody.select(&ROW).enumerate() {
        let cells: Vec<String> = row.select(&CELL).map(cell_text).collect();
        if cells.is_empty() {
            continue;
        }
        if cells.len() != headers.len() {
            let mismatch = TableError::RowShapeMismatch {
                row: row_idx,
                expected: headers.len(),
                found: cells.len(),
            };
            warn!(%mismatch, "skipping row");
            continue;
        }
        records.push(InvestmentRecord::new(
            headers.iter().cloned().zip(cells).collect(),
        ));
    }

    debug!(rows = records.len(), "extracted records");
    Ok(InvestmentTable { headers, records })
}

fn header_text(th: ElementRef) -> String {
    match th.select(&SIZING_LABEL).next() {
        Some(label) => cell_text(label),
        None => cell_text(th),
    }
}

fn cell_text(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sized(header: &str) -> String {
        format!(
            r#"<th class="sorting"><div class="dataTables_sizing" style="height:0;overflow:hidden;">{}</div></th>"#,
            header
        )
    }

    fn table(headers: &[&str], rows: &[&[&str]]) -> String {
        let head: String = headers.iter().map(|h| sized(h)).collect();
        let body: String = rows
            .iter()
            .map(|cells| {
                let tds: String = cells.iter().map(|c| format!("<td>{}</td>", c)).collect();
                format!("<tr role=\"row\">{}</tr>", tds)
            })
            .collect();
        format!(
            "<table id=\"investments-table-object\"><thead><tr>{}</tr></thead><tbody>{}</tbody></table>",
            head, body
        )
    }

    #[test]
    fn zips_headers_with_cells_in_order() {
        let html = table(&["A", "B", "C"], &[&["x", "y", "z"]]);
        let records = extract(&html).unwrap();

        assert_eq!(records.len(), 1);
        let fields: Vec<(&str, &str)> = records[0]
            .fields()
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(fields, vec![("A", "x"), ("B", "y"), ("C", "z")]);
    }

    #[test]
    fn skips_rows_with_wrong_cell_count() {
        let html = table(
            &["A", "B", "C"],
            &[&["x", "y"], &["1", "2", "3"], &["p", "q", "r", "s"]],
        );
        let records = extract(&html).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("A"), Some("1"));
    }

    #[test]
    fn empty_body_is_not_an_error() {
        let html = table(&["A", "B"], &[]);
        let parsed = extract_table(&html).unwrap();

        assert_eq!(parsed.headers, vec!["A", "B"]);
        assert!(parsed.records.is_empty());
    }

    #[test]
    fn zero_cell_padding_rows_are_ignored() {
        let html = r#"<table><thead><tr><th>A</th></tr></thead>
            <tbody><tr></tr><tr><td>v</td></tr><tr class="pad"></tr></tbody></table>"#;
        let records = extract(html).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("A"), Some("v"));
    }

    #[test]
    fn missing_thead_is_malformed() {
        let html = "<table><tbody><tr><td>x</td></tr></tbody></table>";
        assert_eq!(
            extract(html),
            Err(TableError::MalformedTable { missing: "<thead>" })
        );
    }

    #[test]
    fn missing_tbody_is_malformed() {
        let html = "<table><thead><tr><th>A</th></tr></thead></table>";
        assert_eq!(
            extract(html),
            Err(TableError::MalformedTable { missing: "<tbody>" })
        );
    }

    #[test]
    fn rows_outside_tbody_are_malformed() {
        // a parser-inserted tbody doesn't count
        let html = "<table><thead><tr><th>A</th></tr></thead><tr><td>x</td></tr></table>";
        assert_eq!(
            extract(html),
            Err(TableError::MalformedTable { missing: "<tbody>" })
        );
    }

    #[test]
    fn accepts_sections_without_table_wrapper() {
        let html = "<thead><tr><th>A</th></tr></thead><TBODY><tr><td>x</td></tr></TBODY>";
        let records = extract(html).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("A"), Some("x"));
    }

    #[test]
    fn nbsp_cells_become_empty_values() {
        let html = table(&["A", "B"], &[&["&nbsp;", " x "]]);
        let records = extract(&html).unwrap();

        assert_eq!(records[0].get("A"), Some(""));
        assert_eq!(records[0].get("B"), Some("x"));
        assert_eq!(records[0].len(), 2);
    }

    #[test]
    fn header_text_prefers_sizing_label() {
        let html = r#"<table><thead><tr>
            <th aria-label="UII: activate to sort"><div class="dataTables_sizing"> UII </div><span>sort</span></th>
            <th>Bureau</th>
            </tr></thead><tbody><tr><td>1</td><td>2</td></tr></tbody></table>"#;
        let parsed = extract_table(html).unwrap();

        assert_eq!(parsed.headers, vec!["UII", "Bureau"]);
    }

    #[test]
    fn extraction_is_repeatable() {
        let html = table(
            &["UII", "Bureau", "Investment Title"],
            &[&["1", "b", "t1"], &["2", "b", "t2"]],
        );
        assert_eq!(extract(&html).unwrap(), extract(&html).unwrap());
    }

    #[test]
    fn discovers_identifier_and_title_columns() {
        let html = table(&["Bureau", "UII", "Investment Title"], &[]);
        let parsed = extract_table(&html).unwrap();

        assert_eq!(parsed.identifier_column(), Some("UII"));
        assert_eq!(parsed.title_column(), Some("Investment Title"));
    }

    #[test]
    fn table_markup_finds_table_in_page() {
        let page = format!(
            "<html><body><div id=\"investments-table-widget\">{}</div></body></html>",
            table(&["A"], &[&["1"]])
        );
        let markup = table_markup(&page).unwrap();
        assert!(markup.starts_with("<table"));
        assert_eq!(extract(&markup).unwrap().len(), 1);

        assert!(matches!(
            table_markup("<html><body></body></html>"),
            Err(TableError::MalformedTable { .. })
        ));
    }
}
