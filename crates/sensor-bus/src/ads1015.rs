//! ADS1015 Analog to Digital Converter Driver
//!
//! Configured once at init for continuous conversion on AIN0 with PGA
//! gain 8 (full scale ±0.512 V); each read returns the latest conversion.

use crate::bus::I2cBus;
use crate::{BusError, VoltageSource};
use tracing::debug;

/// Default slave address (ADDR pin to ground)
pub const DEFAULT_ADDRESS: u8 = 0x48;

/// Conversion result register
const REG_CONVERSION: u8 = 0x00;
/// Configuration register
const REG_CONFIG: u8 = 0x01;

/// Config word: MUX = AIN0 vs GND, PGA = ±0.512 V, continuous mode,
/// 1600 SPS, comparator disabled.
const CONFIG_WORD: u16 = 0x4883;

/// Full-scale range in volts at PGA gain 8
const FULL_SCALE_V: f64 = 0.512;

/// ADS1015 12-bit ADC reading the TEG output through the switch bank.
pub struct Ads1015<B> {
    bus: B,
}

impl<B: I2cBus> Ads1015<B> {
    /// Take ownership of a bus handle and start continuous conversion.
    pub fn init(mut bus: B) -> Result<Self, BusError> {
        let cfg = CONFIG_WORD.to_be_bytes();
        bus.write(&[REG_CONFIG, cfg[0], cfg[1]])?;
        debug!(
            "ADS1015 at 0x{:02X} in continuous mode, gain 8 (±{} V)",
            bus.address(),
            FULL_SCALE_V
        );
        Ok(Self { bus })
    }

    /// Latest signed 12-bit conversion code.
    fn read_code(&mut self) -> Result<i16, BusError> {
        let mut buf = [0u8; 2];
        self.bus.write_read(REG_CONVERSION, &mut buf)?;
        // 12-bit result left-aligned in the 16-bit register
        Ok(i16::from_be_bytes(buf) >> 4)
    }
}

impl<B: I2cBus> VoltageSource for Ads1015<B> {
    fn read_voltage(&mut self) -> Result<f64, BusError> {
        let code = self.read_code()?;
        Ok(f64::from(code) * FULL_SCALE_V / 2048.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockBus;

    fn adc_with_code(code: i16) -> Ads1015<MockBus> {
        let mut bus = MockBus::new(DEFAULT_ADDRESS);
        bus.push_response(&((code << 4) as u16).to_be_bytes());
        Ads1015::init(bus).unwrap()
    }

    #[test]
    fn init_writes_config_word() {
        let adc = Ads1015::init(MockBus::new(DEFAULT_ADDRESS)).unwrap();
        assert_eq!(adc.bus.writes, vec![vec![0x01, 0x48, 0x83]]);
    }

    #[test]
    fn positive_full_scale_code_converts_to_volts() {
        let mut adc = adc_with_code(2047);
        let v = adc.read_voltage().unwrap();
        assert!((v - 2047.0 * 0.512 / 2048.0).abs() < 1e-9);
    }

    #[test]
    fn zero_code_is_zero_volts() {
        let mut adc = adc_with_code(0);
        assert_eq!(adc.read_voltage().unwrap(), 0.0);
    }

    #[test]
    fn negative_code_converts_to_negative_volts() {
        let mut adc = adc_with_code(-1024);
        let v = adc.read_voltage().unwrap();
        assert!((v + 0.256).abs() < 1e-9);
    }
}
