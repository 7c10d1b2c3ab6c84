//! I2C Sensor Front End
//!
//! Device drivers for the TEG profiler measurement chain:
//! - PCA9536 GPIO expander driving the four load-switch transistors
//! - ADS1015 analog to digital converter (TEG output voltage)
//! - MCP9600 thermocouple amplifier (ambient and hot side temperature)
//!
//! The acquisition core talks to these through the narrow capability
//! traits below, so tests can swap in scripted fakes.

pub mod ads1015;
pub mod bus;
mod error;
pub mod mcp9600;
pub mod pca9536;

pub use ads1015::Ads1015;
pub use bus::{I2cBus, MockBus};
pub use error::BusError;
pub use mcp9600::Mcp9600;
pub use pca9536::Pca9536;

#[cfg(target_os = "linux")]
pub use bus::LinuxI2c;

/// Load-switch selection masks written to the PCA9536 output register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchMask {
    /// All transistor switches off (high impedance, open circuit voltage)
    AllOff,
    /// 0.1 ohm load channel
    Ch0,
    /// 0.47 ohm load channel
    Ch1,
    /// 1.5 ohm load channel
    Ch2,
    /// 4.7 ohm load channel
    Ch3,
}

impl SwitchMask {
    /// The fixed order in which a voltage scan steps through the switches.
    pub const SCAN_ORDER: [SwitchMask; 5] = [
        SwitchMask::AllOff,
        SwitchMask::Ch0,
        SwitchMask::Ch1,
        SwitchMask::Ch2,
        SwitchMask::Ch3,
    ];

    /// Byte written to the expander output register.
    pub fn bits(self) -> u8 {
        match self {
            SwitchMask::AllOff => 0x00,
            SwitchMask::Ch0 => 0x01,
            SwitchMask::Ch1 => 0x02,
            SwitchMask::Ch2 => 0x04,
            SwitchMask::Ch3 => 0x08,
        }
    }
}

/// Single-channel voltage measurement capability.
pub trait VoltageSource: Send {
    /// Read the most recent conversion in volts.
    fn read_voltage(&mut self) -> Result<f64, BusError>;
}

/// Thermocouple measurement capability. The two junctions fail
/// independently: a bad transaction on one does not affect the other.
pub trait TemperatureSource: Send {
    /// Ambient (cold junction) temperature in degrees Celsius.
    fn read_cold_junction(&mut self) -> Result<f64, BusError>;
    /// Probe (hot junction) temperature in degrees Celsius.
    fn read_hot_junction(&mut self) -> Result<f64, BusError>;
}

/// Load-switch multiplexer control capability.
pub trait ChannelSelector: Send {
    /// Drive the switch bank to the given selection state.
    fn select(&mut self, mask: SwitchMask) -> Result<(), BusError>;
}
