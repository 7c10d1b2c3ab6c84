//! Acquisition Loop
//!
//! RUNNING until the stop signal is seen, then STOPPED (terminal). The
//! stop check runs once per cycle, after the cycle's bookkeeping, matching
//! the hold-to-stop button of the profiler hardware.

use crate::{AcquisitionConfig, RotationWorker, ScanSequencer};
use cloud_sync::{CloudPublisher, QoS};
use record_buffer::BatchBuffer;
use sensor_bus::{ChannelSelector, TemperatureSource, VoltageSource};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{error, info};

/// External stop condition, polled once per cycle.
pub trait StopSignal: Send {
    fn is_stop_requested(&self) -> bool;
}

impl StopSignal for Arc<AtomicBool> {
    fn is_stop_requested(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

/// The paced sampling loop driving sequencer, buffer and rotation worker.
pub struct AcquisitionLoop<C, V, T, S> {
    sequencer: ScanSequencer<C, V, T>,
    buffer: BatchBuffer,
    worker: RotationWorker,
    publisher: Option<Arc<CloudPublisher>>,
    stop: S,
    config: AcquisitionConfig,
}

impl<C, V, T, S> AcquisitionLoop<C, V, T, S>
where
    C: ChannelSelector,
    V: VoltageSource,
    T: TemperatureSource,
    S: StopSignal,
{
    pub fn new(
        sequencer: ScanSequencer<C, V, T>,
        worker: RotationWorker,
        publisher: Option<Arc<CloudPublisher>>,
        stop: S,
        config: AcquisitionConfig,
    ) -> Self {
        let buffer = BatchBuffer::new(config.batch_capacity);
        Self {
            sequencer,
            buffer,
            worker,
            publisher,
            stop,
            config,
        }
    }

    /// Run until the stop signal asserts, then drain the rotation worker.
    /// Returns the number of completed cycles.
    pub async fn run(mut self) -> usize {
        info!(
            "starting acquisition: period {:?}, batch capacity {}",
            self.config.period, self.config.batch_capacity
        );
        let mut cycles = 0usize;

        loop {
            let cycle_start = Instant::now();
            let counter = self.buffer.counter();

            let record = self.sequencer.scan(counter).await;

            if self.config.live_publish {
                if let Some(publisher) = &self.publisher {
                    if let Err(e) = publisher
                        .publish_record(counter as u64, &record, QoS::AtLeastOnce)
                        .await
                    {
                        error!("live publish failed at counter {}: {}", counter, e);
                    }
                }
            }

            if let Some(event) = self.buffer.append(record) {
                info!(
                    "batch complete: {} records stored and queued as {}",
                    event.records.len(),
                    event.batch_name
                );
                self.worker.dispatch(event);
            }
            cycles += 1;

            if self.stop.is_stop_requested() {
                break;
            }

            let elapsed = cycle_start.elapsed();
            let pause = if elapsed >= self.config.period {
                self.config.floor_delay
            } else {
                (self.config.period - elapsed).max(self.config.floor_delay)
            };
            tokio::time::sleep(pause).await;
        }

        info!("acquisition stopped after {} cycles", cycles);
        self.worker.shutdown().await;
        cycles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencer::fakes::{FakeSelector, FakeTemps, FakeVolts};
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;
    use storage::CsvStore;

    /// Asserts stop after a fixed number of cycle checks.
    struct StopAfter {
        checks: AtomicUsize,
        limit: usize,
    }

    impl StopAfter {
        fn new(limit: usize) -> Self {
            Self {
                checks: AtomicUsize::new(0),
                limit,
            }
        }
    }

    impl StopSignal for StopAfter {
        fn is_stop_requested(&self) -> bool {
            self.checks.fetch_add(1, Ordering::Relaxed) + 1 >= self.limit
        }
    }

    fn sequencer(
        settle: Duration,
    ) -> ScanSequencer<FakeSelector, FakeVolts, FakeTemps> {
        ScanSequencer::new(
            FakeSelector::default(),
            FakeVolts::new(0.1),
            FakeTemps::new(21.0, 70.0),
            settle,
            Duration::ZERO,
        )
    }

    fn config(capacity: usize) -> AcquisitionConfig {
        AcquisitionConfig {
            period: Duration::from_millis(500),
            settle: Duration::ZERO,
            inter_read: Duration::ZERO,
            floor_delay: Duration::from_millis(10),
            batch_capacity: capacity,
            live_publish: false,
            batch_publish: false,
            rotation_queue_depth: 2,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn paces_cycles_to_the_target_period() {
        let dir = tempfile::tempdir().unwrap();
        let worker = RotationWorker::spawn(CsvStore::new(dir.path()).unwrap(), None, 2);
        let acquisition = AcquisitionLoop::new(
            sequencer(Duration::ZERO),
            worker,
            None,
            StopAfter::new(3),
            config(100),
        );

        let start = Instant::now();
        let cycles = acquisition.run().await;
        assert_eq!(cycles, 3);
        // two full pacing pauses, the third cycle exits before sleeping
        assert_eq!(start.elapsed(), Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn overrunning_cycles_pause_only_for_the_floor_delay() {
        let dir = tempfile::tempdir().unwrap();
        let worker = RotationWorker::spawn(CsvStore::new(dir.path()).unwrap(), None, 2);
        // 150 ms settle x 5 channels = 750 ms per scan, past the 500 ms period
        let acquisition = AcquisitionLoop::new(
            sequencer(Duration::from_millis(150)),
            worker,
            None,
            StopAfter::new(2),
            config(100),
        );

        let start = Instant::now();
        let cycles = acquisition.run().await;
        assert_eq!(cycles, 2);
        // 750 ms scan + 10 ms floor, then a final 750 ms scan
        assert_eq!(start.elapsed(), Duration::from_millis(1510));
    }

    #[tokio::test(start_paused = true)]
    async fn capacity_appends_produce_exactly_one_batch_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path()).unwrap();
        let worker = RotationWorker::spawn(store, None, 2);
        let acquisition = AcquisitionLoop::new(
            sequencer(Duration::ZERO),
            worker,
            None,
            StopAfter::new(3),
            config(3),
        );

        let cycles = acquisition.run().await;
        assert_eq!(cycles, 3);

        let files: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .collect();
        assert_eq!(files.len(), 1);

        let mut reader = csv::Reader::from_path(files[0].path()).unwrap();
        let rows: Vec<_> = reader.records().collect::<Result<_, _>>().unwrap();
        assert_eq!(rows.len(), 3);
    }
}
