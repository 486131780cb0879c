// src/config.rs

use anyhow::{Context, Result};
use std::{env, path::PathBuf, str::FromStr, time::Duration};
use url::Url;

use crate::fetch::WaitPolicy;

pub const DEFAULT_BASE_URL: &str = "https://itdashboard.gov/";
pub const DEFAULT_AGENCY: &str = "National Science Foundation";

/// Runtime settings, read from the environment with defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: Url,
    /// Agency whose investments are scraped; matched against tile link text.
    pub agency: String,
    pub output_dir: PathBuf,
    /// File name of the workbook, created inside `output_dir`.
    pub workbook: String,
    pub report: String,
    pub log_file: PathBuf,
    pub log_level: String,
    pub wait: WaitPolicy,
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; `from_env` passes `std::env::var`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let base_url = get("ITDASH_BASE_URL", DEFAULT_BASE_URL);
        let base_url =
            Url::parse(&base_url).with_context(|| format!("ITDASH_BASE_URL {:?}", base_url))?;

        let wait = WaitPolicy {
            initial: Duration::from_secs(parse_var(&lookup, "ITDASH_DOWNLOAD_WAIT_SECS", 10)?),
            extended: Duration::from_secs(parse_var(&lookup, "ITDASH_DOWNLOAD_RETRY_SECS", 15)?),
            poll: Duration::from_millis(parse_var(&lookup, "ITDASH_POLL_MILLIS", 500)?),
        };

        Ok(Self {
            base_url,
            agency: get("ITDASH_AGENCY", DEFAULT_AGENCY),
            output_dir: PathBuf::from(get("ITDASH_OUTPUT_DIR", "output")),
            workbook: get("ITDASH_WORKBOOK", "excel.xlsx"),
            report: get("ITDASH_REPORT", "report.json"),
            log_file: PathBuf::from(get("ITDASH_LOG_FILE", "log.log")),
            log_level: get("LOG_LEVEL", "info"),
            wait,
            http_timeout: Duration::from_secs(parse_var(&lookup, "ITDASH_HTTP_TIMEOUT_SECS", 20)?),
        })
    }

    pub fn workbook_path(&self) -> PathBuf {
        self.output_dir.join(&self.workbook)
    }

    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(&self.report)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid {} value {:?}", key, raw)),
        None => Ok(default),
    }
}
