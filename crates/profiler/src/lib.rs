//! Profiler Application Support
//!
//! Startup configuration and logging shared by the acquisition daemon and
//! the batch uploader.

mod config;

pub use config::{AppConfig, ConfigError, DEFAULT_CONFIG_PATH};

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Initialize logging for a profiler binary.
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    // A second init (e.g. in tests) is harmless.
    let _ = tracing::subscriber::set_global_default(subscriber);
}
