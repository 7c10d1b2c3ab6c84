//! TEG Profiler Acquisition Daemon
//!
//! Polls the I2C measurement chain at a fixed period, batches records and
//! rotates completed batches to local CSV plus the cloud broker. Stops
//! cleanly on Ctrl-C, letting in-flight rotations drain first.

#[cfg(not(target_os = "linux"))]
fn main() {
    eprintln!("teg-profiler drives /dev/i2c-* and only runs on Linux");
    std::process::exit(1);
}

#[cfg(target_os = "linux")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    linux::run().await
}

#[cfg(target_os = "linux")]
mod linux {
    use acquisition::{AcquisitionConfig, AcquisitionLoop, RotationWorker, ScanSequencer};
    use cloud_sync::{CloudConfig, CloudPublisher};
    use profiler::{init_logging, AppConfig};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use storage::CsvStore;
    use tracing::info;

    pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
        init_logging();
        info!("=== TEG profiler v{} ===", env!("CARGO_PKG_VERSION"));

        let config_path = AppConfig::path_from_args();
        let config = AppConfig::load(&config_path)?;
        info!(
            "application {} configured from {}",
            config.app_id,
            config_path.display()
        );

        let store = CsvStore::new(&config.storage_dir)?;

        let publisher = match &config.broker_address {
            Some(host) => {
                let cloud = CloudConfig {
                    broker_host: host.clone(),
                    broker_port: config.broker_port,
                    app_id: config.app_id.clone(),
                    topic: config.topic.clone(),
                };
                Some(Arc::new(CloudPublisher::connect(cloud).await?))
            }
            None => {
                info!("no broker configured, running local-only");
                None
            }
        };

        let acq = AcquisitionConfig {
            period: Duration::from_millis(config.sampling_period_ms),
            batch_capacity: config.batch_capacity,
            live_publish: config.live_publish && publisher.is_some(),
            batch_publish: config.batch_publish && publisher.is_some(),
            ..AcquisitionConfig::default()
        };

        info!("starting I2C devices on {}", config.i2c_device);
        let selector = sensor_bus::Pca9536::init(sensor_bus::LinuxI2c::open(
            &config.i2c_device,
            sensor_bus::pca9536::DEFAULT_ADDRESS,
        )?)?;
        let adc = sensor_bus::Ads1015::init(sensor_bus::LinuxI2c::open(
            &config.i2c_device,
            sensor_bus::ads1015::DEFAULT_ADDRESS,
        )?)?;
        let thermocouple = sensor_bus::Mcp9600::init(sensor_bus::LinuxI2c::open(
            &config.i2c_device,
            sensor_bus::mcp9600::DEFAULT_ADDRESS,
        )?)?;

        let stop = Arc::new(AtomicBool::new(false));
        {
            let stop = Arc::clone(&stop);
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("stop requested, finishing current cycle");
                    stop.store(true, Ordering::Relaxed);
                }
            });
        }

        let sequencer =
            ScanSequencer::new(selector, adc, thermocouple, acq.settle, acq.inter_read);
        let batch_publisher = if acq.batch_publish {
            publisher.clone()
        } else {
            None
        };
        let worker = RotationWorker::spawn(store, batch_publisher, acq.rotation_queue_depth);

        let cycles = AcquisitionLoop::new(sequencer, worker, publisher, stop, acq)
            .run()
            .await;
        info!("profiler interrupted, {} cycles acquired", cycles);
        Ok(())
    }
}
