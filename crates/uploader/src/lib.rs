//! Batch File Uploader
//!
//! Offline job that pushes completed CSV batches to the collection server.
//! Runs separately from the acquisition daemon: it enumerates the storage
//! directory, optionally writes a manifest of the filenames it found, then
//! POSTs each file to the upload endpoint with the application identity
//! header. Per-file failures are logged and skipped so one bad transfer
//! never aborts the run.

use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, warn};

/// Manifest file written alongside the batches when enabled
const MANIFEST_NAME: &str = "manifest.txt";

/// Pause between consecutive uploads
const UPLOAD_SPACING: Duration = Duration::from_secs(2);

/// Upload errors
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server rejected {file}: status {status}")]
    Status { file: String, status: u16 },
}

/// Uploader configuration
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Upload endpoint, e.g. `http://host:1237/upload`
    pub endpoint: String,
    /// Application identity sent as the `APP_ID` header
    pub app_id: String,
    /// Directory containing completed batch files
    pub storage_dir: PathBuf,
    /// Write a manifest of filenames before uploading
    pub write_manifest: bool,
}

/// Outcome of one uploader run.
#[derive(Debug, Default)]
pub struct UploadReport {
    pub uploaded: usize,
    pub failed: usize,
}

/// Enumerate regular files in the storage directory, sorted by name.
///
/// The manifest from a previous run is excluded; a fresh one is written
/// (and then uploaded with the batches) when enabled.
pub fn list_batches(dir: &Path) -> Result<Vec<PathBuf>, UploadError> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .filter(|path| path.file_name().and_then(|n| n.to_str()) != Some(MANIFEST_NAME))
        .collect();
    files.sort();
    Ok(files)
}

/// Write the manifest listing the given files, one name per line.
pub fn write_manifest(dir: &Path, files: &[PathBuf]) -> Result<PathBuf, UploadError> {
    let path = dir.join(MANIFEST_NAME);
    let mut lines = String::new();
    for file in files {
        if let Some(name) = file.file_name().and_then(|n| n.to_str()) {
            lines.push_str(name);
            lines.push('\n');
        }
    }
    std::fs::write(&path, lines)?;
    Ok(path)
}

/// Run one upload pass over the storage directory.
pub async fn run(config: &UploadConfig) -> Result<UploadReport, UploadError> {
    let mut files = list_batches(&config.storage_dir)?;
    if config.write_manifest {
        let manifest = write_manifest(&config.storage_dir, &files)?;
        files.push(manifest);
    }

    info!(
        "uploading {} files from {} to {}",
        files.len(),
        config.storage_dir.display(),
        config.endpoint
    );

    let client = reqwest::Client::new();
    let mut report = UploadReport::default();

    for file in &files {
        match upload_file(&client, config, file).await {
            Ok(()) => {
                info!("uploaded {}", file.display());
                report.uploaded += 1;
            }
            Err(e) => {
                error!("upload of {} failed: {}", file.display(), e);
                report.failed += 1;
            }
        }
        tokio::time::sleep(UPLOAD_SPACING).await;
    }

    if report.failed > 0 {
        warn!("{} of {} uploads failed", report.failed, files.len());
    }
    Ok(report)
}

async fn upload_file(
    client: &reqwest::Client,
    config: &UploadConfig,
    path: &Path,
) -> Result<(), UploadError> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("batch.csv")
        .to_string();
    let bytes = tokio::fs::read(path).await?;

    let form = reqwest::multipart::Form::new()
        .part("upload", reqwest::multipart::Part::bytes(bytes).file_name(name.clone()));

    let response = client
        .post(&config.endpoint)
        .header("APP_ID", &config.app_id)
        .multipart(form)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(UploadError::Status {
            file: name,
            status: response.status().as_u16(),
        });
    }
    Ok(())
}
