//! Cloud Synchronization Module
//!
//! MQTT publishing of profiler records with:
//! - Per-cycle live publishing tagged with the cycle counter
//! - Batch publishing of a full rotation with paced message spacing
//! - The fixed payload shape expected by the broker-side ingest

mod payload;
mod publisher;

pub use payload::RecordMessage;
pub use publisher::{CloudConfig, CloudPublisher};

pub use rumqttc::QoS;

use thiserror::Error;

/// Cloud sync error types
#[derive(Debug, Error)]
pub enum CloudError {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("publish failed: {0}")]
    Publish(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}
