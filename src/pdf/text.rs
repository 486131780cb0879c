// src/pdf/text.rs

use anyhow::{Context, Result};
use lopdf::Document;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, instrument};

use super::fields::{extract_fields, PdfExtract};
use crate::error::ExtractError;

/// Source of raw page text for a PDF on disk.
pub trait PdfText {
    /// Text of `page` (1-based).
    fn page_text(&self, path: &Path, page: u32) -> Result<String>;
}

/// Text layer extraction backed by `lopdf`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfText;

impl PdfText for LopdfText {
    fn page_text(&self, path: &Path, page: u32) -> Result<String> {
        let doc = Document::load(path).with_context(|| format!("loading {}", path.display()))?;
        doc.extract_text(&[page])
            .with_context(|| format!("extracting page {} of {}", page, path.display()))
    }
}

/// A successfully parsed document, remembered with the file it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentExtract {
    pub file: PathBuf,
    #[serde(flatten)]
    pub extract: PdfExtract,
}

/// Parse the first page of each file in `files`, in the order given.
///
/// Documents whose text can't be read, or that lack an anchor, are logged
/// and left out; they never abort the run.
#[instrument(level = "info", skip_all, fields(files = files.len()))]
pub fn collect_extracts<S: PdfText>(files: &[PathBuf], source: &S) -> Vec<DocumentExtract> {
    let mut extracts = Vec::with_capacity(files.len());
    for file in files {
        let file = file.clone();
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| file.display().to_string());

        let parsed = source
            .page_text(&file, 1)
            .map_err(|e| {
                debug!(file = %name, error = %e, "text extraction failed");
                ExtractError::NoReadableText
            })
            .and_then(|text| extract_fields(&text));

        match parsed {
            Ok(extract) => {
                debug!(file = %name, title = %extract.title, uii = %extract.identifier, "parsed");
                extracts.push(DocumentExtract { file, extract });
            }
            Err(e) => error!(file = %name, error = %e, "excluding document from reconciliation"),
        }
    }

    info!(parsed = extracts.len(), "collected pdf extracts");
    extracts
}
