//! PCA9536 GPIO Expander Driver
//!
//! Drives the four transistor load switches of the TEG measurement board.

use crate::bus::I2cBus;
use crate::{BusError, ChannelSelector, SwitchMask};
use tracing::debug;

/// Default slave address on the profiler board
pub const DEFAULT_ADDRESS: u8 = 0x41;

/// Configuration register (pin direction)
const REG_CONFIG: u8 = 0x03;
/// Output port register
const REG_OUTPUT: u8 = 0x01;

/// PCA9536 four-bit GPIO expander.
pub struct Pca9536<B> {
    bus: B,
}

impl<B: I2cBus> Pca9536<B> {
    /// Take ownership of a bus handle and configure all pins as outputs
    /// with every switch off.
    pub fn init(mut bus: B) -> Result<Self, BusError> {
        bus.write(&[REG_CONFIG, 0x00])?;
        bus.write(&[REG_OUTPUT, SwitchMask::AllOff.bits()])?;
        debug!("PCA9536 at 0x{:02X} configured, all switches off", bus.address());
        Ok(Self { bus })
    }
}

impl<B: I2cBus> ChannelSelector for Pca9536<B> {
    fn select(&mut self, mask: SwitchMask) -> Result<(), BusError> {
        self.bus.write(&[REG_OUTPUT, mask.bits()])
    }
}
