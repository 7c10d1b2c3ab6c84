//! MCP9600 Thermocouple Amplifier Driver
//!
//! Default K-type configuration. Hot junction is the probe on the TEG hot
//! side, cold junction doubles as the ambient measurement.

use crate::bus::I2cBus;
use crate::{BusError, TemperatureSource};
use tracing::debug;

/// Default slave address on the profiler board
pub const DEFAULT_ADDRESS: u8 = 0x60;

/// Hot junction temperature register
const REG_HOT_JUNCTION: u8 = 0x00;
/// Cold junction temperature register
const REG_COLD_JUNCTION: u8 = 0x02;

/// Degrees Celsius per LSB
const DEG_PER_LSB: f64 = 0.0625;

/// MCP9600 thermocouple EMF to temperature converter.
pub struct Mcp9600<B> {
    bus: B,
}

impl<B: I2cBus> Mcp9600<B> {
    /// Take ownership of a bus handle; the power-on default configuration
    /// (K-type, 0.0625 °C resolution) is used as-is.
    pub fn init(bus: B) -> Result<Self, BusError> {
        debug!("MCP9600 at 0x{:02X} using power-on K-type config", bus.address());
        Ok(Self { bus })
    }

    fn read_temperature(&mut self, reg: u8) -> Result<f64, BusError> {
        let mut buf = [0u8; 2];
        self.bus.write_read(reg, &mut buf)?;
        Ok(f64::from(i16::from_be_bytes(buf)) * DEG_PER_LSB)
    }
}

impl<B: I2cBus> TemperatureSource for Mcp9600<B> {
    fn read_cold_junction(&mut self) -> Result<f64, BusError> {
        self.read_temperature(REG_COLD_JUNCTION)
    }

    fn read_hot_junction(&mut self) -> Result<f64, BusError> {
        self.read_temperature(REG_HOT_JUNCTION)
    }
}
