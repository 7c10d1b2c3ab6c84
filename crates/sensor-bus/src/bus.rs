//! Raw I2C Bus Access
//!
//! One `I2cBus` handle per device address. The Linux implementation wraps
//! `/dev/i2c-*` through the `i2cdev` crate; `MockBus` provides scripted
//! transactions for tests without hardware.

use crate::BusError;
use std::collections::VecDeque;

/// Raw byte-level I2C transactions against a single slave address.
pub trait I2cBus: Send {
    /// Write raw bytes to the device.
    fn write(&mut self, bytes: &[u8]) -> Result<(), BusError>;

    /// Read bytes from the device into `buf`.
    fn read(&mut self, buf: &mut [u8]) -> Result<(), BusError>;

    /// Write a register pointer then read back `buf.len()` bytes.
    fn write_read(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), BusError> {
        self.write(&[reg])?;
        self.read(buf)
    }

    /// Slave address this handle is bound to.
    fn address(&self) -> u8;
}

/// Linux userspace I2C device handle.
#[cfg(target_os = "linux")]
pub struct LinuxI2c {
    device: i2cdev::linux::LinuxI2CDevice,
    address: u8,
}

#[cfg(target_os = "linux")]
impl LinuxI2c {
    /// Open a bus device node bound to the given slave address,
    /// e.g. `LinuxI2c::open("/dev/i2c-1", 0x48)`.
    pub fn open(path: &str, address: u8) -> Result<Self, BusError> {
        let device = i2cdev::linux::LinuxI2CDevice::new(path, u16::from(address))
            .map_err(|e| BusError::Open {
                device: path.to_string(),
                reason: e.to_string(),
            })?;
        tracing::debug!("opened {} at address 0x{:02X}", path, address);
        Ok(Self { device, address })
    }
}

#[cfg(target_os = "linux")]
impl I2cBus for LinuxI2c {
    fn write(&mut self, bytes: &[u8]) -> Result<(), BusError> {
        use i2cdev::core::I2CDevice;
        self.device.write(bytes).map_err(|e| BusError::Write {
            address: self.address,
            reason: e.to_string(),
        })
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<(), BusError> {
        use i2cdev::core::I2CDevice;
        self.device.read(buf).map_err(|e| BusError::Read {
            address: self.address,
            reason: e.to_string(),
        })
    }

    fn address(&self) -> u8 {
        self.address
    }
}

/// Scripted in-memory bus for testing device drivers without hardware.
///
/// Writes are recorded; reads pop from a queue of canned responses. A
/// failure can be armed to fire on the next transaction.
pub struct MockBus {
    address: u8,
    /// Every write issued, in order
    pub writes: Vec<Vec<u8>>,
    /// Canned responses returned by successive reads
    responses: VecDeque<Vec<u8>>,
    fail_next: bool,
}

impl MockBus {
    /// Create a mock bus for the given slave address.
    pub fn new(address: u8) -> Self {
        Self {
            address,
            writes: Vec::new(),
            responses: VecDeque::new(),
            fail_next: false,
        }
    }

    /// Queue a canned read response.
    pub fn push_response(&mut self, bytes: &[u8]) {
        self.responses.push_back(bytes.to_vec());
    }

    /// Arm a failure for the next transaction.
    pub fn fail_next(&mut self) {
        self.fail_next = true;
    }

    fn take_failure(&mut self) -> bool {
        std::mem::take(&mut self.fail_next)
    }
}

impl I2cBus for MockBus {
    fn write(&mut self, bytes: &[u8]) -> Result<(), BusError> {
        if self.take_failure() {
            return Err(BusError::Write {
                address: self.address,
                reason: "injected failure".to_string(),
            });
        }
        self.writes.push(bytes.to_vec());
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<(), BusError> {
        if self.take_failure() {
            return Err(BusError::Read {
                address: self.address,
                reason: "injected failure".to_string(),
            });
        }
        let response = self.responses.pop_front().ok_or_else(|| BusError::Read {
            address: self.address,
            reason: "no scripted response".to_string(),
        })?;
        if response.len() != buf.len() {
            return Err(BusError::InvalidResponse {
                address: self.address,
                reason: format!(
                    "scripted response is {} bytes, read wants {}",
                    response.len(),
                    buf.len()
                ),
            });
        }
        buf.copy_from_slice(&response);
        Ok(())
    }

    fn address(&self) -> u8 {
        self.address
    }
}
