// src/pdf/fields.rs

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::ExtractError;

pub const TITLE_ANCHOR: &str = "Name of this Investment: ";
pub const SECTION_END_ANCHOR: &str = "Section B";
pub const UII_ANCHOR: &str = "2. Unique Investment Identifier (UII): ";

static LINE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n|\r|\n").expect("line break regex"));

/// Title and identifier read from a Business Case PDF's first page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PdfExtract {
    pub title: String,
    pub identifier: String,
}

/// Replace every line break with a single space so anchors wrapped across
/// lines read as contiguous text.
pub fn normalize_newlines(text: &str) -> String {
    LINE_BREAK.replace_all(text, " ").into_owned()
}

/// Pull `(title, identifier)` out of raw first-page text.
///
/// The segment between the title anchor and the next `Section B` is split on
/// the UII anchor: the part before it is the title, the part after it the
/// identifier. Any missing or repeated anchor fails the whole document.
pub fn extract_fields(text: &str) -> Result<PdfExtract, ExtractError> {
    let text = normalize_newlines(text);
    if text.trim().is_empty() {
        return Err(ExtractError::NoReadableText);
    }

    let titles = text.matches(TITLE_ANCHOR).count();
    if titles > 1 {
        return Err(ExtractError::RepeatedAnchor {
            anchor: TITLE_ANCHOR,
            count: titles,
        });
    }

    let start = text
        .find(TITLE_ANCHOR)
        .ok_or(ExtractError::AnchorNotFound {
            anchor: TITLE_ANCHOR,
        })?
        + TITLE_ANCHOR.len();
    let rest = &text[start..];
    let end = rest
        .find(SECTION_END_ANCHOR)
        .ok_or(ExtractError::AnchorNotFound {
            anchor: SECTION_END_ANCHOR,
        })?;
    let segment = &rest[..end];

    match segment.matches(UII_ANCHOR).count() {
        0 => {
            return Err(ExtractError::AnchorNotFound { anchor: UII_ANCHOR });
        }
        1 => {}
        count => {
            return Err(ExtractError::RepeatedAnchor {
                anchor: UII_ANCHOR,
                count,
            });
        }
    }

    let (title, identifier) = segment
        .split_once(UII_ANCHOR)
        .ok_or(ExtractError::AnchorNotFound { anchor: UII_ANCHOR })?;
    let (title, identifier) = (title.trim(), identifier.trim());
    if title.is_empty() {
        return Err(ExtractError::EmptyField { field: "title" });
    }
    if identifier.is_empty() {
        return Err(ExtractError::EmptyField {
            field: "identifier",
        });
    }

    Ok(PdfExtract {
        title: title.to_string(),
        identifier: identifier.to_string(),
    })
}
