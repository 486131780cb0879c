// src/sheet.rs

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;
use tracing::{info, instrument};

use crate::extract::{AgencyTile, InvestmentTable};

pub const AGENCIES_SHEET: &str = "Agencies";
pub const TABLE_SHEET: &str = "Table";

/// One worksheet's worth of string cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetData {
    pub name: String,
    /// Written in bold as row 0 when present.
    pub header: Option<Vec<String>>,
    pub rows: Vec<Vec<String>>,
}

impl SheetData {
    /// Agency name and amount per row, no header row.
    pub fn agencies(tiles: &[AgencyTile]) -> Self {
        Self {
            name: AGENCIES_SHEET.to_string(),
            header: None,
            rows: tiles
                .iter()
                .map(|t| vec![t.name.clone(), t.amount.clone()])
                .collect(),
        }
    }

    /// Discovered headers followed by each record in header order.
    pub fn investments(table: &InvestmentTable) -> Self {
        Self {
            name: TABLE_SHEET.to_string(),
            header: Some(table.headers.clone()),
            rows: table.rows(),
        }
    }
}

/// Create (or replace) the workbook at `path` with `sheets`, in order.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn write_workbook(path: &Path, sheets: &[SheetData]) -> Result<()> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    for sheet in sheets {
        let ws = workbook.add_worksheet();
        ws.set_name(sheet.name.as_str())
            .with_context(|| format!("naming worksheet {:?}", sheet.name))?;

        let mut row_idx: u32 = 0;
        if let Some(header) = &sheet.header {
            for (col, value) in header.iter().enumerate() {
                let col = column_index(col)?;
                ws.write_string_with_format(row_idx, col, value.as_str(), &bold)?;
            }
            row_idx += 1;
        }
        for row in &sheet.rows {
            for (col, value) in row.iter().enumerate() {
                let col = column_index(col)?;
                ws.write_string(row_idx, col, value.as_str())?;
            }
            row_idx += 1;
        }
        info!(sheet = %sheet.name, rows = sheet.rows.len(), "wrote worksheet");
    }

    workbook
        .save(path)
        .with_context(|| format!("saving workbook {}", path.display()))?;
    Ok(())
}

fn column_index(col: usize) -> Result<u16> {
    u16::try_from(col).with_context(|| format!("column {} out of range", col))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::InvestmentRecord;
    use std::{fs::File, io::Read};
    use tempfile::tempdir;
    use zip::ZipArchive;

    #[test]
    fn builds_sheet_data_from_scraped_values() {
        let tiles = vec![AgencyTile {
            name: "National Science Foundation".into(),
            amount: "$156.7M".into(),
        }];
        let agencies = SheetData::agencies(&tiles);
        assert_eq!(agencies.name, "Agencies");
        assert!(agencies.header.is_none());
        assert_eq!(agencies.rows, vec![vec!["National Science Foundation", "$156.7M"]]);

        let table = InvestmentTable {
            headers: vec!["UII".into(), "Investment Title".into()],
            records: vec![InvestmentRecord::new(vec![
                ("UII".into(), "422-1".into()),
                ("Investment Title".into(), "Grants".into()),
            ])],
        };
        let investments = SheetData::investments(&table);
        assert_eq!(investments.name, "Table");
        assert_eq!(
            investments.header,
            Some(vec!["UII".to_string(), "Investment Title".to_string()])
        );
        assert_eq!(investments.rows, vec![vec!["422-1", "Grants"]]);
    }

    #[test]
    fn writes_workbook_file() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("excel.xlsx");
        let sheets = vec![
            SheetData {
                name: AGENCIES_SHEET.into(),
                header: None,
                rows: vec![vec!["A".into(), "$1".into()]],
            },
            SheetData {
                name: TABLE_SHEET.into(),
                header: Some(vec!["UII".into()]),
                rows: vec![],
            },
        ];

        write_workbook(&path, &sheets).unwrap();

        let mut archive = ZipArchive::new(File::open(&path).unwrap()).unwrap();
        let mut manifest = String::new();
        archive
            .by_name("xl/workbook.xml")
            .unwrap()
            .read_to_string(&mut manifest)
            .unwrap();
        let agencies = manifest.find(r#"name="Agencies""#).unwrap();
        let table = manifest.find(r#"name="Table""#).unwrap();
        assert!(agencies < table);
    }

    #[test]
    fn column_index_rejects_overflow() {
        assert_eq!(column_index(3).unwrap(), 3);
        assert!(column_index(usize::from(u16::MAX) + 1).is_err());
    }
}
