// src/fetch/http.rs

use anyhow::{Context, Result};
use reqwest::Client;
use std::{path::Path, time::Duration};
use tokio::fs;
use tracing::debug;
use url::Url;

use super::PageDriver;
use crate::extract::{business_case_link, document_stem};

/// Page driver that talks to the dashboard over plain HTTP.
#[derive(Clone)]
pub struct HttpDriver {
    client: Client,
}

impl HttpDriver {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()
            .context("building HTTP client")?;
        Ok(Self { client })
    }
}

async fn get_text(client: &Client, url: &Url) -> Result<String> {
    debug!("Fetching text from {}", url);
    client
        .get(url.clone())
        .send()
        .await
        .with_context(|| format!("GET {} failed", url))?
        .error_for_status()
        .with_context(|| format!("Non-success status {}", url))?
        .text()
        .await
        .with_context(|| format!("Reading text from {}", url))
}

impl PageDriver for HttpDriver {
    async fn page_markup(&self, url: &Url) -> Result<String> {
        get_text(&self.client, url).await
    }

    async fn request_download(&self, link: &Url, dest_dir: &Path) -> Result<()> {
        let stem = document_stem(link).with_context(|| format!("no file name in {}", link))?;
        let page = get_text(&self.client, link).await?;
        let pdf_url = business_case_link(&page, link)
            .with_context(|| format!("no Business Case link on {}", link))?;

        let bytes = self
            .client
            .get(pdf_url.clone())
            .send()
            .await
            .with_context(|| format!("GET {} failed", pdf_url))?
            .error_for_status()?
            .bytes()
            .await
            .with_context(|| format!("reading body from {}", pdf_url))?;

        // Write under a temporary name so the final file only ever appears complete.
        let part = dest_dir.join(format!("{}.pdf.part", stem));
        let dest = dest_dir.join(format!("{}.pdf", stem));
        fs::write(&part, &bytes)
            .await
            .with_context(|| format!("writing {}", part.display()))?;
        fs::rename(&part, &dest)
            .await
            .with_context(|| format!("renaming {} to {}", part.display(), dest.display()))?;
        debug!(file = %dest.display(), bytes = bytes.len(), "saved document");
        Ok(())
    }
}
