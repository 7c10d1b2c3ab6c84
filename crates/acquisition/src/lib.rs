//! Acquisition Core
//!
//! Drives the profiler at a fixed period: each cycle runs one multiplexed
//! voltage scan plus the thermocouple reads, appends the record to the
//! batch buffer, and hands completed batches to the rotation worker for
//! persistence and cloud publishing without ever blocking the loop.

mod config;
mod rotation;
mod runner;
mod sequencer;

pub use config::AcquisitionConfig;
pub use rotation::RotationWorker;
pub use runner::{AcquisitionLoop, StopSignal};
pub use sequencer::ScanSequencer;
