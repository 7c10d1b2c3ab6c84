//! Scan Sequencer
//!
//! One scan walks the load-switch bank in fixed order, reading the shared
//! ADC channel after each selection settles, then takes both thermocouple
//! junctions. Every sub-read is independently fallible: a failure leaves
//! that field at the sentinel, is logged with the cycle counter, and the
//! remaining sub-reads still run. Retry is left to the next cycle.

use chrono::Utc;
use record_buffer::Record;
use sensor_bus::{BusError, ChannelSelector, SwitchMask, TemperatureSource, VoltageSource};
use std::time::Duration;
use tracing::error;

/// Executes the fixed channel-scan sequence and produces one record.
pub struct ScanSequencer<C, V, T> {
    selector: C,
    voltage: V,
    temperature: T,
    settle: Duration,
    inter_read: Duration,
}

impl<C, V, T> ScanSequencer<C, V, T>
where
    C: ChannelSelector,
    V: VoltageSource,
    T: TemperatureSource,
{
    pub fn new(
        selector: C,
        voltage: V,
        temperature: T,
        settle: Duration,
        inter_read: Duration,
    ) -> Self {
        Self {
            selector,
            voltage,
            temperature,
            settle,
            inter_read,
        }
    }

    /// Run one full scan. Always returns a record; failed sub-reads hold
    /// the sentinel and are logged with `counter` and the cycle timestamp.
    pub async fn scan(&mut self, counter: usize) -> Record {
        let mut record = Record::unread(Utc::now());

        for (step, mask) in SwitchMask::SCAN_ORDER.into_iter().enumerate() {
            match self.read_channel(mask).await {
                Ok(volts) => *voltage_field(&mut record, step) = volts,
                Err(e) => error!(
                    "voltage scan step {:?} failed at counter {}, timestamp {}: {}",
                    mask,
                    counter,
                    record.timestamp_iso(),
                    e
                ),
            }
            if step + 1 < SwitchMask::SCAN_ORDER.len() {
                tokio::time::sleep(self.inter_read).await;
            }
        }

        match self.temperature.read_cold_junction() {
            Ok(celsius) => record.temp_ambient = celsius,
            Err(e) => error!(
                "ambient temperature read failed at counter {}, timestamp {}: {}",
                counter,
                record.timestamp_iso(),
                e
            ),
        }
        match self.temperature.read_hot_junction() {
            Ok(celsius) => record.temp_hot = celsius,
            Err(e) => error!(
                "hot side temperature read failed at counter {}, timestamp {}: {}",
                counter,
                record.timestamp_iso(),
                e
            ),
        }

        record
    }

    async fn read_channel(&mut self, mask: SwitchMask) -> Result<f64, BusError> {
        self.selector.select(mask)?;
        tokio::time::sleep(self.settle).await;
        self.voltage.read_voltage()
    }
}

fn voltage_field(record: &mut Record, step: usize) -> &mut f64 {
    match step {
        0 => &mut record.voltage_off,
        1 => &mut record.voltage_ch0,
        2 => &mut record.voltage_ch1,
        3 => &mut record.voltage_ch2,
        _ => &mut record.voltage_ch3,
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use sensor_bus::{BusError, ChannelSelector, SwitchMask, TemperatureSource, VoltageSource};

    fn injected(reason: &str) -> BusError {
        BusError::Read {
            address: 0x48,
            reason: reason.to_string(),
        }
    }

    /// Selector that records selections and can fail on one of them.
    #[derive(Default)]
    pub struct FakeSelector {
        pub selections: Vec<SwitchMask>,
        pub fail_on: Option<SwitchMask>,
    }

    impl ChannelSelector for FakeSelector {
        fn select(&mut self, mask: SwitchMask) -> Result<(), BusError> {
            if self.fail_on == Some(mask) {
                return Err(injected("selector failure"));
            }
            self.selections.push(mask);
            Ok(())
        }
    }

    /// Voltage source returning `base + 0.01 * call_index`, with an
    /// optional failure on one call.
    pub struct FakeVolts {
        pub base: f64,
        pub calls: usize,
        pub fail_on_call: Option<usize>,
    }

    impl FakeVolts {
        pub fn new(base: f64) -> Self {
            Self {
                base,
                calls: 0,
                fail_on_call: None,
            }
        }
    }

    impl VoltageSource for FakeVolts {
        fn read_voltage(&mut self) -> Result<f64, BusError> {
            let call = self.calls;
            self.calls += 1;
            if self.fail_on_call == Some(call) {
                return Err(injected("adc failure"));
            }
            Ok(self.base + 0.01 * call as f64)
        }
    }

    /// Thermocouple source with independently failable junctions.
    pub struct FakeTemps {
        pub ambient: f64,
        pub hot: f64,
        pub fail_cold: bool,
        pub fail_hot: bool,
    }

    impl FakeTemps {
        pub fn new(ambient: f64, hot: f64) -> Self {
            Self {
                ambient,
                hot,
                fail_cold: false,
                fail_hot: false,
            }
        }
    }

    impl TemperatureSource for FakeTemps {
        fn read_cold_junction(&mut self) -> Result<f64, BusError> {
            if self.fail_cold {
                return Err(injected("cold junction failure"));
            }
            Ok(self.ambient)
        }

        fn read_hot_junction(&mut self) -> Result<f64, BusError> {
            if self.fail_hot {
                return Err(injected("hot junction failure"));
            }
            Ok(self.hot)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fakes::*;
    use super::*;
    use record_buffer::SENTINEL;

    fn sequencer(
        selector: FakeSelector,
        volts: FakeVolts,
        temps: FakeTemps,
    ) -> ScanSequencer<FakeSelector, FakeVolts, FakeTemps> {
        ScanSequencer::new(selector, volts, temps, Duration::ZERO, Duration::ZERO)
    }

    #[tokio::test]
    async fn full_scan_populates_every_field_in_order() {
        let mut seq = sequencer(
            FakeSelector::default(),
            FakeVolts::new(0.1),
            FakeTemps::new(22.5, 85.0),
        );
        let record = seq.scan(0).await;

        assert_eq!(seq.selector.selections, SwitchMask::SCAN_ORDER);
        assert!((record.voltage_off - 0.10).abs() < 1e-9);
        assert!((record.voltage_ch0 - 0.11).abs() < 1e-9);
        assert!((record.voltage_ch1 - 0.12).abs() < 1e-9);
        assert!((record.voltage_ch2 - 0.13).abs() < 1e-9);
        assert!((record.voltage_ch3 - 0.14).abs() < 1e-9);
        assert_eq!(record.temp_ambient, 22.5);
        assert_eq!(record.temp_hot, 85.0);
    }

    #[tokio::test]
    async fn failed_sub_read_leaves_only_that_field_at_sentinel() {
        let mut volts = FakeVolts::new(0.1);
        volts.fail_on_call = Some(2); // the ch1 read
        let mut seq = sequencer(FakeSelector::default(), volts, FakeTemps::new(22.5, 85.0));
        let record = seq.scan(1).await;

        assert_eq!(record.voltage_ch1, SENTINEL);
        assert_ne!(record.voltage_off, SENTINEL);
        assert_ne!(record.voltage_ch0, SENTINEL);
        assert_ne!(record.voltage_ch2, SENTINEL);
        assert_ne!(record.voltage_ch3, SENTINEL);
        assert_eq!(record.temp_ambient, 22.5);
        assert_eq!(record.temp_hot, 85.0);
    }

    #[tokio::test]
    async fn selector_failure_skips_only_that_channels_read() {
        let selector = FakeSelector {
            fail_on: Some(SwitchMask::Ch2),
            ..Default::default()
        };
        let mut seq = sequencer(selector, FakeVolts::new(0.1), FakeTemps::new(20.0, 75.0));
        let record = seq.scan(2).await;

        assert_eq!(record.voltage_ch2, SENTINEL);
        assert_ne!(record.voltage_ch3, SENTINEL);
        // the ADC was read once per surviving channel only
        assert_eq!(seq.voltage.calls, 4);
    }

    #[tokio::test]
    async fn temperature_failures_are_independent_of_the_voltage_group() {
        let mut temps = FakeTemps::new(20.0, 75.0);
        temps.fail_hot = true;
        let mut seq = sequencer(FakeSelector::default(), FakeVolts::new(0.2), temps);
        let record = seq.scan(3).await;

        assert_eq!(record.temp_hot, SENTINEL);
        assert_eq!(record.temp_ambient, 20.0);
        assert_ne!(record.voltage_off, SENTINEL);
    }
}
