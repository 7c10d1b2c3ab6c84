//! Rotation Worker
//!
//! Consumes rotation events on a bounded queue and runs the batch CSV
//! write and optional batch publish. The acquisition loop hands events off
//! with `try_send`, so a slow SD card or broker can never stall sampling;
//! if the queue is full the batch is dropped with an error log. The
//! original scripts spawned an unmanaged thread per rotation — the bounded
//! queue with join-on-shutdown replaces that.

use cloud_sync::CloudPublisher;
use record_buffer::RotationEvent;
use std::sync::Arc;
use storage::CsvStore;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Background consumer for rotation events.
pub struct RotationWorker {
    tx: mpsc::Sender<RotationEvent>,
    handle: JoinHandle<()>,
}

impl RotationWorker {
    /// Spawn the worker task. `publisher` enables batch publishing after
    /// each successful or failed CSV write.
    pub fn spawn(
        store: CsvStore,
        publisher: Option<Arc<CloudPublisher>>,
        queue_depth: usize,
    ) -> Self {
        let (tx, mut rx) = mpsc::channel::<RotationEvent>(queue_depth.max(1));
        let handle = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                info!(
                    "rotating batch {} ({} records)",
                    event.batch_name,
                    event.records.len()
                );
                match store.write_batch(&event.batch_name, &event.records).await {
                    Ok(path) => info!("batch stored at {}", path.display()),
                    // no retry or re-queue: the batch's local copy is lost
                    Err(e) => error!("batch {} write failed, data lost: {}", event.batch_name, e),
                }
                if let Some(publisher) = &publisher {
                    if let Err(e) = publisher.publish_batch(&event.records).await {
                        error!("batch {} publish failed: {}", event.batch_name, e);
                    }
                }
            }
        });
        Self { tx, handle }
    }

    /// Queue a rotation event without blocking. A full queue drops the
    /// event; a closed queue only happens after `shutdown`.
    pub fn dispatch(&self, event: RotationEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                error!(
                    "rotation queue full, dropping batch {} ({} records)",
                    event.batch_name,
                    event.records.len()
                );
            }
            Err(TrySendError::Closed(event)) => {
                error!("rotation worker gone, dropping batch {}", event.batch_name);
            }
        }
    }

    /// Close the queue and wait for in-flight rotations to finish.
    pub async fn shutdown(self) {
        drop(self.tx);
        if let Err(e) = self.handle.await {
            error!("rotation worker join failed: {}", e);
        }
    }
}
