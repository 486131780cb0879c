// src/run.rs

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::{fs, path::PathBuf};
use tracing::{info, instrument};
use url::Url;

use crate::{
    cleanup::remove_duplicate_files,
    config::Config,
    extract::{agency_link, extract_agency_tiles, extract_table, investment_links, table_markup},
    fetch::{download_documents, PageDriver},
    pdf::{collect_extracts, DocumentExtract, PdfExtract, PdfText},
    reconcile::{reconcile, ReconciliationResult},
    sheet::{write_workbook, SheetData},
};

/// Everything a run produced, written to `report.json`.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub generated_at: DateTime<Utc>,
    pub agency: String,
    pub agency_url: Url,
    pub agencies: usize,
    pub records: usize,
    pub downloaded: Vec<PathBuf>,
    pub failed_downloads: Vec<Url>,
    pub documents: Vec<DocumentExtract>,
    pub result: ReconciliationResult,
}

/// Scrape, persist, download and reconcile, in that order.
///
/// Only structural failures (missing tiles widget, unknown agency, missing
/// table) and I/O errors on the output folder stop the run.
#[instrument(level = "info", skip_all, fields(agency = %cfg.agency))]
pub async fn run<D, S>(cfg: &Config, driver: &D, pdf: &S) -> Result<RunReport>
where
    D: PageDriver,
    S: PdfText,
{
    // ─── 1) output folder ────────────────────────────────────────────
    fs::create_dir_all(&cfg.output_dir)
        .with_context(|| format!("creating {}", cfg.output_dir.display()))?;
    let workbook = cfg.workbook_path();

    // ─── 2) agency tiles → "Agencies" ────────────────────────────────
    let home = driver.page_markup(&cfg.base_url).await?;
    let tiles = extract_agency_tiles(&home).context("reading agency tiles")?;
    info!(count = tiles.len(), "agency tiles");
    let agencies = SheetData::agencies(&tiles);
    write_workbook(&workbook, std::slice::from_ref(&agencies))?;

    // ─── 3) agency investments → "Table" ─────────────────────────────
    let agency_url = agency_link(&home, &cfg.agency, &cfg.base_url)
        .with_context(|| format!("no link for agency {:?}", cfg.agency))?;
    info!(url = %agency_url, "agency page");
    let page = driver.page_markup(&agency_url).await?;
    let markup = table_markup(&page).context("locating investments table")?;
    let table = extract_table(&markup).context("reading investments table")?;
    info!(
        columns = table.headers.len(),
        records = table.records.len(),
        "investments table"
    );
    write_workbook(&workbook, &[agencies, SheetData::investments(&table)])?;

    // ─── 4) business case PDFs, one at a time ────────────────────────
    let links = investment_links(&markup, &cfg.base_url);
    info!(count = links.len(), "investment links");
    let downloads = download_documents(driver, &links, &cfg.output_dir, cfg.wait).await?;

    // ─── 5) tidy folder ──────────────────────────────────────────────
    remove_duplicate_files(&cfg.output_dir, &[cfg.workbook.as_str(), cfg.report.as_str()])?;

    // ─── 6) reconcile ────────────────────────────────────────────────
    let documents = collect_extracts(&downloads.downloaded, pdf);
    let extracts: Vec<PdfExtract> = documents.iter().map(|d| d.extract.clone()).collect();
    let result = reconcile(&table.records, &extracts);

    let report = RunReport {
        generated_at: Utc::now(),
        agency: cfg.agency.clone(),
        agency_url,
        agencies: tiles.len(),
        records: table.records.len(),
        downloaded: downloads.downloaded,
        failed_downloads: downloads.failed,
        documents,
        result,
    };

    let report_path = cfg.report_path();
    let json = serde_json::to_string_pretty(&report).context("serializing run report")?;
    fs::write(&report_path, json).with_context(|| format!("writing {}", report_path.display()))?;
    info!(file = %report_path.display(), "wrote run report");

    Ok(report)
}
