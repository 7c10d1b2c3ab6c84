//! MQTT Publisher

use crate::{CloudError, RecordMessage};
use record_buffer::Record;
use rumqttc::{AsyncClient, Event, MqttOptions, QoS};
use std::time::Duration;
use tracing::{debug, error, info};

/// Spacing between messages during a batch publish
const BATCH_MESSAGE_SPACING: Duration = Duration::from_millis(200);

/// Cloud publisher configuration
#[derive(Debug, Clone)]
pub struct CloudConfig {
    /// MQTT broker host
    pub broker_host: String,
    /// MQTT broker port
    pub broker_port: u16,
    /// Application identity used as client id and payload `app_id`
    pub app_id: String,
    /// Topic records are published to
    pub topic: String,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            broker_host: "localhost".to_string(),
            broker_port: 1883,
            app_id: "teg-eh-profiler".to_string(),
            topic: "linklab/teg_eh_profiler".to_string(),
        }
    }
}

/// MQTT client publishing profiler records to the cloud broker.
pub struct CloudPublisher {
    config: CloudConfig,
    client: AsyncClient,
}

impl CloudPublisher {
    /// Connect to the broker and spawn the event loop driver task.
    pub async fn connect(config: CloudConfig) -> Result<Self, CloudError> {
        let mut options = MqttOptions::new(
            config.app_id.clone(),
            &config.broker_host,
            config.broker_port,
        );
        options.set_keep_alive(Duration::from_secs(30));

        let (client, mut eventloop) = AsyncClient::new(options, 10);

        // Drive the connection; poll errors are logged and retried with a
        // fixed pause rather than tearing down the publisher.
        tokio::spawn(async move {
            loop {
                match eventloop.poll().await {
                    Ok(Event::Incoming(incoming)) => {
                        debug!("MQTT incoming: {:?}", incoming);
                    }
                    Err(e) => {
                        error!("MQTT connection error: {}", e);
                        tokio::time::sleep(Duration::from_secs(5)).await;
                    }
                    _ => {}
                }
            }
        });

        client
            .subscribe(&config.topic, QoS::AtMostOnce)
            .await
            .map_err(|e| CloudError::Connection(e.to_string()))?;

        info!(
            "connected to MQTT broker {}:{} as {}",
            config.broker_host, config.broker_port, config.app_id
        );
        Ok(Self { config, client })
    }

    /// Publish one record tagged with a sequence counter.
    pub async fn publish_record(
        &self,
        counter: u64,
        record: &Record,
        qos: QoS,
    ) -> Result<(), CloudError> {
        let message = RecordMessage::new(&self.config.app_id, counter, record);
        let payload = serde_json::to_vec(&message)
            .map_err(|e| CloudError::Serialization(e.to_string()))?;

        self.client
            .publish(&self.config.topic, qos, false, payload)
            .await
            .map_err(|e| CloudError::Publish(e.to_string()))
    }

    /// Publish a completed batch, one message per record with the counter
    /// equal to the record's index, paced 200 ms apart.
    pub async fn publish_batch(&self, records: &[Record]) -> Result<(), CloudError> {
        for (index, record) in records.iter().enumerate() {
            self.publish_record(index as u64, record, QoS::AtMostOnce)
                .await?;
            tokio::time::sleep(BATCH_MESSAGE_SPACING).await;
        }
        info!("published batch of {} records", records.len());
        Ok(())
    }
}
