// src/error.rs

use std::{path::PathBuf, time::Duration};

/// Structural problems with scraped page markup.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TableError {
    /// A required container (`thead`, `tbody`, a widget id) is missing.
    #[error("malformed table: no {missing} found in markup")]
    MalformedTable { missing: &'static str },

    /// A body row whose cell count disagrees with the header count.
    /// Never returned from `extract`; logged when the row is skipped.
    #[error("row {row} has {found} cells, expected {expected}")]
    RowShapeMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Failures recovering fields from a document's first page.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("anchor {anchor:?} not found")]
    AnchorNotFound { anchor: &'static str },

    /// The identifier anchor occurs more than once inside one title segment,
    /// so there is no single correct split.
    #[error("anchor {anchor:?} occurs {count} times in one segment")]
    RepeatedAnchor { anchor: &'static str, count: usize },

    #[error("{field} is empty after trimming")]
    EmptyField { field: &'static str },

    #[error("no readable text")]
    NoReadableText,
}

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("{} did not appear within {:.1}s", file.display(), waited.as_secs_f64())]
    Timeout { file: PathBuf, waited: Duration },
}
