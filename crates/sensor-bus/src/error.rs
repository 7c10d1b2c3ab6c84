//! Bus Error Types

use thiserror::Error;

/// Errors that can occur during an I2C transaction.
#[derive(Debug, Error)]
pub enum BusError {
    /// Failed to open the bus device node
    #[error("failed to open I2C device {device}: {reason}")]
    Open { device: String, reason: String },

    /// Write transaction failed
    #[error("I2C write to 0x{address:02X} failed: {reason}")]
    Write { address: u8, reason: String },

    /// Read transaction failed
    #[error("I2C read from 0x{address:02X} failed: {reason}")]
    Read { address: u8, reason: String },

    /// Device returned data the driver cannot interpret
    #[error("invalid response from 0x{address:02X}: {reason}")]
    InvalidResponse { address: u8, reason: String },
}
