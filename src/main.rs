use anyhow::Result;
use itdashboard::{config::Config, fetch::HttpDriver, logging, pdf::LopdfText, run::run};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) config + logging ─────────────────────────────────────────
    let cfg = Config::from_env()?;
    logging::init(&cfg.log_level, &cfg.log_file);
    info!(base = %cfg.base_url, agency = %cfg.agency, "startup");

    // ─── 2) driver ───────────────────────────────────────────────────
    let driver = HttpDriver::new(cfg.http_timeout)?;

    // ─── 3) run ──────────────────────────────────────────────────────
    match run(&cfg, &driver, &LopdfText).await {
        Ok(report) => {
            info!(
                records = report.records,
                downloaded = report.downloaded.len(),
                failed = report.failed_downloads.len(),
                "RESULT: {}",
                report.result
            );
            Ok(())
        }
        Err(e) => {
            error!("run failed: {:#}", e);
            Err(e)
        }
    }
}
