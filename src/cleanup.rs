// src/cleanup.rs

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{error, info};

/// `name (n).ext` copies a browser makes when a file is downloaded twice.
static DUPLICATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<stem>.+) \((?P<n>[0-4])\)(?P<ext>\.[^.]+)?$").expect("duplicate regex"));

/// Name of the file `name` duplicates, if it looks like a numbered copy.
pub fn duplicate_original(name: &str) -> Option<String> {
    let caps = DUPLICATE.captures(name)?;
    let ext = caps.name("ext").map(|m| m.as_str()).unwrap_or("");
    Some(format!("{}{}", &caps["stem"], ext))
}

fn is_pdf(name: &str) -> bool {
    Path::new(name)
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// Tidy the download folder so only one copy of each PDF remains.
///
/// Numbered copies are removed when their original exists. Anything that
/// isn't a PDF is removed unless its name is in `keep`.
pub fn remove_duplicate_files(dir: &Path, keep: &[&str]) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();
    let entries = fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))?;

    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if keep.contains(&name.as_str()) {
            continue;
        }

        let is_copy = duplicate_original(&name)
            .map(|original| dir.join(original).exists())
            .unwrap_or(false);
        if !is_copy && is_pdf(&name) {
            continue;
        }

        let path = entry.path();
        match fs::remove_file(&path) {
            Ok(()) => {
                info!("deleted {}", path.display());
                removed.push(path);
            }
            Err(e) => error!("failed to delete {}: {}", path.display(), e),
        }
    }

    removed.sort();
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn recognises_numbered_copies() {
        assert_eq!(duplicate_original("422-01 (1).pdf").as_deref(), Some("422-01.pdf"));
        assert_eq!(duplicate_original("report (0)").as_deref(), Some("report"));
        assert_eq!(duplicate_original("422-01 (7).pdf"), None);
        assert_eq!(duplicate_original("422-01.pdf"), None);
    }

    #[test]
    fn removes_copies_and_stray_files() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path();
        for name in [
            "a.pdf",
            "a (1).pdf",
            "a (2).pdf",
            "b (1).pdf",
            "c.pdf.part",
            "excel.xlsx",
            "report.json",
            "notes.txt",
        ] {
            fs::write(dir.join(name), b"x").unwrap();
        }
        fs::create_dir(dir.join("nested")).unwrap();

        let removed = remove_duplicate_files(dir, &["excel.xlsx", "report.json"]).unwrap();

        let mut left: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        left.sort();
        assert_eq!(
            left,
            vec!["a.pdf", "b (1).pdf", "excel.xlsx", "nested", "report.json"]
        );
        assert_eq!(removed.len(), 4);
    }
}
