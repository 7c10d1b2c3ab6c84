//! Profiler Record Type

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Marker value for a field whose read failed this cycle.
pub const SENTINEL: f64 = -999.99;

/// CSV header row, fixed for compatibility with existing consumers.
pub const CSV_HEADER: [&str; 8] = [
    "Timestamp",
    "voltage_chan_OFF",
    "voltage_chan_0",
    "voltage_chan_1",
    "voltage_chan_2",
    "voltage_chan_3",
    "temperature_amb",
    "temperature_hot",
];

/// One acquisition cycle's worth of measurements.
///
/// Field order and count are fixed for the lifetime of a run. A record is
/// constructed fresh each cycle; failed sub-reads leave [`SENTINEL`] in the
/// affected field, every other field is populated normally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// Cycle start time (UTC)
    pub timestamp: DateTime<Utc>,
    /// Open circuit voltage, all switches off (V)
    pub voltage_off: f64,
    /// Voltage across the 0.1 ohm channel (V)
    pub voltage_ch0: f64,
    /// Voltage across the 0.47 ohm channel (V)
    pub voltage_ch1: f64,
    /// Voltage across the 1.5 ohm channel (V)
    pub voltage_ch2: f64,
    /// Voltage across the 4.7 ohm channel (V)
    pub voltage_ch3: f64,
    /// Ambient (cold junction) temperature (°C)
    pub temp_ambient: f64,
    /// Hot side (hot junction) temperature (°C)
    pub temp_hot: f64,
}

impl Record {
    /// A record with every measurement at the sentinel, timestamped at the
    /// start of the cycle that will fill it.
    pub fn unread(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            voltage_off: SENTINEL,
            voltage_ch0: SENTINEL,
            voltage_ch1: SENTINEL,
            voltage_ch2: SENTINEL,
            voltage_ch3: SENTINEL,
            temp_ambient: SENTINEL,
            temp_hot: SENTINEL,
        }
    }

    /// Timestamp in the wire format shared by CSV and MQTT consumers:
    /// ISO-8601 with microseconds and a trailing `Z`.
    pub fn timestamp_iso(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    /// Batch file stem derived from this record's timestamp.
    pub fn batch_name(&self) -> String {
        self.timestamp.format("%Y%m%d_%H_%M").to_string()
    }

    /// CSV cells in fixed field order, matching [`CSV_HEADER`].
    pub fn csv_row(&self) -> [String; 8] {
        [
            self.timestamp_iso(),
            self.voltage_off.to_string(),
            self.voltage_ch0.to_string(),
            self.voltage_ch1.to_string(),
            self.voltage_ch2.to_string(),
            self.voltage_ch3.to_string(),
            self.temp_ambient.to_string(),
            self.temp_hot.to_string(),
        ]
    }
}
