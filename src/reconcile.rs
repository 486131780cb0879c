// src/reconcile.rs

use serde::Serialize;
use std::fmt;
use tracing::info;

use crate::extract::InvestmentRecord;
use crate::pdf::PdfExtract;

/// One confirmed (extract, record) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    pub extract: usize,
    pub record: usize,
    pub title: String,
    pub identifier: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ReconciliationResult {
    /// Every matching (extract, record) pair, duplicates included.
    pub matched: usize,
    /// Extracts that took part, i.e. the ones that parsed.
    pub total: usize,
    pub matches: Vec<Match>,
}

impl fmt::Display for ReconciliationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} out of {} matched", self.matched, self.total)
    }
}

/// Count records containing both the title and identifier of each extract.
///
/// Containment is checked against the record's whole value set, so column
/// order does not matter. A pair found in several records counts once per
/// record.
pub fn reconcile(records: &[InvestmentRecord], extracts: &[PdfExtract]) -> ReconciliationResult {
    let mut result = ReconciliationResult {
        total: extracts.len(),
        ..Default::default()
    };

    for (ei, extract) in extracts.iter().enumerate() {
        for (ri, record) in records.iter().enumerate() {
            if record.contains_value(&extract.identifier) && record.contains_value(&extract.title) {
                info!(
                    "Unique Investment Identifier (UII): {} and Name of this Investment: \"{}\" found in table row {}",
                    extract.identifier, extract.title, ri + 1
                );
                result.matches.push(Match {
                    extract: ei,
                    record: ri,
                    title: extract.title.clone(),
                    identifier: extract.identifier.clone(),
                });
            }
        }
    }

    result.matched = result.matches.len();
    info!("RESULT: {}", result);
    result
}
