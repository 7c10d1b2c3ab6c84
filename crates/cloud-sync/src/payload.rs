//! Broker Payload Shape
//!
//! The field names below are part of the wire contract with the cloud
//! ingest and must not change.

use record_buffer::Record;
use serde::Serialize;

/// One published measurement field.
#[derive(Debug, Clone, Serialize)]
pub struct PayloadField {
    #[serde(rename = "displayName")]
    pub display_name: &'static str,
    pub unit: &'static str,
    pub value: f64,
}

/// The seven measurement fields, in fixed order.
#[derive(Debug, Clone, Serialize)]
pub struct PayloadFields {
    #[serde(rename = "voltage_chan_OFF")]
    pub voltage_chan_off: PayloadField,
    pub voltage_chan_0: PayloadField,
    pub voltage_chan_1: PayloadField,
    pub voltage_chan_2: PayloadField,
    pub voltage_chan_3: PayloadField,
    pub temperature_amb: PayloadField,
    pub temperature_hot: PayloadField,
}

/// Message metadata block.
#[derive(Debug, Clone, Serialize)]
pub struct Metadata {
    pub time: String,
}

/// Full message envelope published per record.
#[derive(Debug, Clone, Serialize)]
pub struct RecordMessage {
    pub app_id: String,
    pub counter: u64,
    pub payload_fields: PayloadFields,
    pub metadata: Metadata,
}

impl RecordMessage {
    /// Build the envelope for one record, tagged with a sequence counter.
    pub fn new(app_id: &str, counter: u64, record: &Record) -> Self {
        Self {
            app_id: app_id.to_string(),
            counter,
            payload_fields: PayloadFields {
                voltage_chan_off: PayloadField {
                    display_name: "High Impedance",
                    unit: "V",
                    value: record.voltage_off,
                },
                voltage_chan_0: PayloadField {
                    display_name: "Channel 0",
                    unit: "V",
                    value: record.voltage_ch0,
                },
                voltage_chan_1: PayloadField {
                    display_name: "Channel 1",
                    unit: "V",
                    value: record.voltage_ch1,
                },
                voltage_chan_2: PayloadField {
                    display_name: "Channel 2",
                    unit: "V",
                    value: record.voltage_ch2,
                },
                voltage_chan_3: PayloadField {
                    display_name: "Channel 3",
                    unit: "V",
                    value: record.voltage_ch3,
                },
                temperature_amb: PayloadField {
                    display_name: "Ambient temperature",
                    unit: "°C",
                    value: record.temp_ambient,
                },
                temperature_hot: PayloadField {
                    display_name: "Hot side temperature",
                    unit: "°C",
                    value: record.temp_hot,
                },
            },
            metadata: Metadata {
                time: record.timestamp_iso(),
            },
        }
    }
}
