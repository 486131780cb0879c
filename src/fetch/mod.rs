// src/fetch/mod.rs

use anyhow::Result;
use std::{future::Future, path::Path};
use url::Url;

pub mod documents;
pub mod http;

pub use documents::{download_documents, wait_for_file, DownloadReport, WaitPolicy};
pub use http::HttpDriver;

/// Handle to whatever renders the dashboard (a browser session, plain HTTP,
/// a recorded snapshot). Passed explicitly to the code that needs it.
pub trait PageDriver {
    /// Current markup of the page at `url`.
    fn page_markup(&self, url: &Url) -> impl Future<Output = Result<String>> + Send;

    /// Start fetching the Business Case PDF behind an investment link into
    /// `dest_dir`. The file may land after this returns; callers wait for
    /// it on disk.
    fn request_download(
        &self,
        link: &Url,
        dest_dir: &Path,
    ) -> impl Future<Output = Result<()>> + Send;
}
