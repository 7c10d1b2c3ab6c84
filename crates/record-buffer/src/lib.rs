//! Record Batch Buffer
//!
//! Fixed-shape measurement records, a preallocated batch buffer that fills
//! and rotates, and the rotation events handed to persistence and
//! transmission consumers.

mod buffer;
mod record;

pub use buffer::{BatchBuffer, RotationEvent, DEFAULT_CAPACITY};
pub use record::{Record, CSV_HEADER, SENTINEL};
