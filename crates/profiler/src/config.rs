//! Application Configuration
//!
//! Loaded once at startup from the application info JSON file. The upper
//! case keys match the `Application_info.txt` format already deployed on
//! the profiler units; everything beyond identity and addresses has a
//! default mirroring the field deployment.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Where the application info file lives on the profiler units
pub const DEFAULT_CONFIG_PATH: &str = "/home/pi/Desktop/Application_info.txt";

/// Startup configuration errors. Always fatal: the process must not run
/// without an application identity.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("{0} is required but not configured")]
    Missing(&'static str),
}

/// Immutable process-lifetime configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Cloud identity of this profiler unit
    #[serde(rename = "APP_ID")]
    pub app_id: String,

    /// MQTT broker address; publishing is disabled when absent
    #[serde(rename = "BROKER_ADDRESS", default)]
    pub broker_address: Option<String>,

    /// MQTT broker port
    #[serde(default = "default_broker_port")]
    pub broker_port: u16,

    /// HTTP endpoint for the offline batch uploader
    #[serde(rename = "UPLOAD_URL", default)]
    pub upload_url: Option<String>,

    /// Directory for completed CSV batches
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,

    /// I2C bus device node the sensors hang off
    #[serde(default = "default_i2c_device")]
    pub i2c_device: String,

    /// Sampling period in milliseconds
    #[serde(default = "default_sampling_period_ms")]
    pub sampling_period_ms: u64,

    /// Records per batch
    #[serde(default = "default_batch_capacity")]
    pub batch_capacity: usize,

    /// MQTT topic for record publishing
    #[serde(default = "default_topic")]
    pub topic: String,

    /// Publish every record live as it is sampled
    #[serde(default)]
    pub live_publish: bool,

    /// Publish each completed batch at rotation time
    #[serde(default = "default_true")]
    pub batch_publish: bool,

    /// Have the uploader write a manifest of batch filenames
    #[serde(default)]
    pub write_manifest: bool,
}

fn default_broker_port() -> u16 {
    1883
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from("/home/pi/Desktop/shared/data")
}

fn default_i2c_device() -> String {
    "/dev/i2c-1".to_string()
}

fn default_sampling_period_ms() -> u64 {
    500
}

fn default_batch_capacity() -> usize {
    record_buffer::DEFAULT_CAPACITY
}

fn default_topic() -> String {
    "linklab/teg_eh_profiler".to_string()
}

fn default_true() -> bool {
    true
}

impl AppConfig {
    /// Load and validate the application info file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let body = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: AppConfig =
            serde_json::from_str(&body).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        if config.app_id.is_empty() {
            return Err(ConfigError::Missing("APP_ID"));
        }
        Ok(config)
    }

    /// Config file path from the first CLI argument, falling back to the
    /// deployed default location.
    pub fn path_from_args() -> PathBuf {
        std::env::args()
            .nth(1)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }
}
