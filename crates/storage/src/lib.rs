//! Storage Layer
//!
//! Writes completed record batches to local CSV files, one file per
//! rotation, named after the batch.

mod store;

pub use store::CsvStore;

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV encoding error: {0}")]
    Encode(#[from] csv::Error),
    #[error("write task failed: {0}")]
    Join(String),
}
