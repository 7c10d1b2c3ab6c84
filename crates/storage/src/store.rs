//! CSV Batch Writer

use crate::StorageError;
use record_buffer::{Record, CSV_HEADER};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Writes record batches as CSV files under a storage directory.
#[derive(Debug, Clone)]
pub struct CsvStore {
    dir: PathBuf,
}

impl CsvStore {
    /// Bind to a storage directory, creating it if absent.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        info!("storing batches under {}", dir.display());
        Ok(Self { dir })
    }

    /// The bound storage directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write one batch as `<dir>/<batch_name>.csv` with the fixed header
    /// and one row per record in insertion order.
    ///
    /// Runs on the blocking pool so a slow SD card never stalls the
    /// acquisition loop's executor.
    pub async fn write_batch(
        &self,
        batch_name: &str,
        records: &[Record],
    ) -> Result<PathBuf, StorageError> {
        let path = self.dir.join(format!("{batch_name}.csv"));
        let rows: Vec<[String; 8]> = records.iter().map(Record::csv_row).collect();
        let task_path = path.clone();

        tokio::task::spawn_blocking(move || write_rows(&task_path, &rows))
            .await
            .map_err(|e| StorageError::Join(e.to_string()))??;

        debug!("wrote {} rows to {}", records.len(), path.display());
        Ok(path)
    }
}

fn write_rows(path: &Path, rows: &[[String; 8]]) -> Result<(), StorageError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(CSV_HEADER)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use record_buffer::SENTINEL;

    fn records(count: usize) -> Vec<Record> {
        let base = Utc.with_ymd_and_hms(2021, 2, 3, 4, 5, 6).unwrap();
        (0..count)
            .map(|i| {
                let mut r = Record::unread(base + Duration::seconds(i as i64));
                r.voltage_off = 0.25;
                r.voltage_ch0 = 0.1 * i as f64;
                r.temp_ambient = 21.5;
                r.temp_hot = 80.0;
                r
            })
            .collect()
    }

    #[tokio::test]
    async fn batch_round_trips_with_fixed_header() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path()).unwrap();

        let batch = records(5);
        let path = store.write_batch("20210203_04_05", &batch).await.unwrap();
        assert_eq!(path.file_name().unwrap(), "20210203_04_05.csv");

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let header: Vec<String> = reader
            .headers()
            .unwrap()
            .iter()
            .map(String::from)
            .collect();
        assert_eq!(header, CSV_HEADER);

        let rows: Vec<csv::StringRecord> =
            reader.records().collect::<Result<_, _>>().unwrap();
        assert_eq!(rows.len(), 5);
        assert_eq!(&rows[0][0], "2021-02-03T04:05:06.000000Z");
        assert_eq!(&rows[2][2], "0.2");
        // unread fields keep the sentinel in the file
        assert_eq!(&rows[0][3], &SENTINEL.to_string());
    }

    #[tokio::test]
    async fn creates_missing_storage_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("shared").join("data");
        let store = CsvStore::new(&nested).unwrap();
        store.write_batch("20210101_00_00", &records(1)).await.unwrap();
        assert!(nested.join("20210101_00_00.csv").exists());
    }
}
