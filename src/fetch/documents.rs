// src/fetch/documents.rs

use anyhow::{Context, Result};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};
use tokio::{
    fs,
    time::{sleep, Instant},
};
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use super::PageDriver;
use crate::error::DownloadError;
use crate::extract::document_stem;

/// How long to wait for a requested document to show up on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub initial: Duration,
    /// Second and last window after `initial` runs out.
    pub extended: Duration,
    pub poll: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            initial: Duration::from_secs(10),
            extended: Duration::from_secs(15),
            poll: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Default)]
pub struct DownloadReport {
    pub downloaded: Vec<PathBuf>,
    pub failed: Vec<Url>,
}

/// Poll until `path` exists or `timeout` elapses.
pub async fn wait_for_file(
    path: &Path,
    timeout: Duration,
    poll: Duration,
) -> Result<(), DownloadError> {
    let deadline = Instant::now() + timeout;
    loop {
        if fs::try_exists(path).await.unwrap_or(false) {
            return Ok(());
        }
        let now = Instant::now();
        if now >= deadline {
            return Err(DownloadError::Timeout {
                file: path.to_path_buf(),
                waited: timeout,
            });
        }
        sleep(poll.min(deadline - now)).await;
    }
}

/// Delete leftovers from an earlier run so the wait only sees a fresh file.
async fn remove_stale(paths: &[&Path]) -> Result<()> {
    for path in paths {
        match fs::remove_file(path).await {
            Ok(()) => debug!(file = %path.display(), "removed previous download"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e).with_context(|| format!("removing {}", path.display())),
        }
    }
    Ok(())
}

/// Download each link's document into `dest_dir`, one at a time.
///
/// The next request is only made once the previous file is on disk or has
/// timed out, so the existence check always refers to a single download.
/// Failures are logged and recorded; they never stop the loop.
#[instrument(level = "info", skip_all, fields(links = links.len(), dir = %dest_dir.display()))]
pub async fn download_documents<D: PageDriver>(
    driver: &D,
    links: &[Url],
    dest_dir: &Path,
    policy: WaitPolicy,
) -> Result<DownloadReport> {
    fs::create_dir_all(dest_dir)
        .await
        .with_context(|| format!("creating {}", dest_dir.display()))?;

    let mut report = DownloadReport::default();
    for link in links {
        let Some(stem) = document_stem(link) else {
            warn!(%link, "link has no file name; skipping");
            report.failed.push(link.clone());
            continue;
        };
        let expected = dest_dir.join(format!("{}.pdf", stem));
        let partial = dest_dir.join(format!("{}.pdf.part", stem));
        if let Err(e) = remove_stale(&[expected.as_path(), partial.as_path()]).await {
            error!(%link, error = %e, "could not clear previous download");
            report.failed.push(link.clone());
            continue;
        }

        if let Err(e) = driver.request_download(link, dest_dir).await {
            error!(%link, error = %e, "download request failed");
            report.failed.push(link.clone());
            continue;
        }

        let arrived = match wait_for_file(&expected, policy.initial, policy.poll).await {
            Ok(()) => Ok(()),
            Err(_) => {
                debug!(
                    "File {}.pdf wasn't downloaded. Wait {} more seconds.",
                    stem,
                    policy.extended.as_secs_f64()
                );
                wait_for_file(&expected, policy.extended, policy.poll).await
            }
        };

        match arrived {
            Ok(()) => {
                debug!("File {}.pdf was downloaded.", stem);
                report.downloaded.push(expected);
            }
            Err(e) => {
                error!(%link, error = %e, "download timed out");
                report.failed.push(link.clone());
            }
        }
    }

    info!(
        downloaded = report.downloaded.len(),
        failed = report.failed.len(),
        "downloads finished"
    );
    Ok(report)
}
