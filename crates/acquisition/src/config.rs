//! Acquisition configuration

use std::time::Duration;

/// Timing and batching parameters for the acquisition loop.
#[derive(Debug, Clone)]
pub struct AcquisitionConfig {
    /// Target cycle period (default 500 ms, i.e. 0.5 Hz sampling)
    pub period: Duration,
    /// Settle delay after driving the switch bank, before the ADC read
    pub settle: Duration,
    /// Pause between consecutive voltage sub-reads
    pub inter_read: Duration,
    /// Minimum end-of-cycle pause when a cycle overruns the period
    pub floor_delay: Duration,
    /// Records per batch (default 1800 = 15 min at the default period)
    pub batch_capacity: usize,
    /// Publish every record live, tagged with the cycle counter
    pub live_publish: bool,
    /// Publish each completed batch from the rotation worker
    pub batch_publish: bool,
    /// In-flight rotation events the worker queue will hold
    pub rotation_queue_depth: usize,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_millis(500),
            settle: Duration::from_millis(10),
            inter_read: Duration::from_millis(5),
            floor_delay: Duration::from_millis(10),
            batch_capacity: record_buffer::DEFAULT_CAPACITY,
            live_publish: false,
            batch_publish: true,
            rotation_queue_depth: 2,
        }
    }
}
