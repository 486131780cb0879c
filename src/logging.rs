// src/logging.rs

use std::{
    fs::{File, OpenOptions},
    path::Path,
    sync::Mutex,
};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber: stdout plus an append-only plain-text file.
///
/// `RUST_LOG` takes precedence over `level`. If `log_file` can't be opened
/// only stdout is installed.
pub fn init(level: &str, log_file: &Path) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, file_error) = match open_log_file(log_file) {
        Ok(file) => {
            let layer = fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file));
            (Some(layer), None)
        }
        Err(e) => (None, Some(e)),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(file_layer)
        .init();

    match file_error {
        None => info!(file = %log_file.display(), "logging to file"),
        Some(e) => warn!(file = %log_file.display(), error = %e, "file logging disabled"),
    }
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
