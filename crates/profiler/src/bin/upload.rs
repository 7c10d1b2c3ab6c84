//! TEG Batch Uploader
//!
//! Offline job pushing completed CSV batches to the collection server.
//! Run it after an acquisition session, or from cron on the deployed
//! units; the acquisition daemon does not need to be stopped.

use profiler::{init_logging, AppConfig, ConfigError};
use tracing::{error, info};
use uploader::UploadConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config_path = AppConfig::path_from_args();
    let config = AppConfig::load(&config_path)?;
    let endpoint = config
        .upload_url
        .clone()
        .ok_or(ConfigError::Missing("UPLOAD_URL"))?;

    let report = uploader::run(&UploadConfig {
        endpoint,
        app_id: config.app_id,
        storage_dir: config.storage_dir,
        write_manifest: config.write_manifest,
    })
    .await?;

    info!(
        "upload finished: {} sent, {} failed",
        report.uploaded, report.failed
    );
    if report.uploaded == 0 && report.failed > 0 {
        error!("every upload failed");
        std::process::exit(1);
    }
    Ok(())
}
