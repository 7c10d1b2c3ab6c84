//! Batch Buffer Implementation

use crate::Record;

/// Default batch capacity (1800 cycles = 15 min at a 0.5 s period)
pub const DEFAULT_CAPACITY: usize = 1800;

/// A full batch handed to persistence and transmission consumers.
///
/// `records` is an owned snapshot: the producer reuses its storage and
/// begins overwriting slot 0 immediately after the handoff.
#[derive(Debug, Clone)]
pub struct RotationEvent {
    /// File stem derived from the final record's timestamp (`YYYYMMDD_HH_MM`)
    pub batch_name: String,
    /// All records of the batch, in insertion order
    pub records: Vec<Record>,
}

/// Fixed-capacity record buffer with a wrapping cycle counter.
///
/// Single writer; storage is preallocated once and reused across batches.
pub struct BatchBuffer {
    slots: Vec<Option<Record>>,
    capacity: usize,
    counter: usize,
}

impl BatchBuffer {
    /// Create a buffer that rotates after `capacity` appends.
    ///
    /// # Panics
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "batch capacity must be at least 1");
        Self {
            slots: vec![None; capacity],
            capacity,
            counter: 0,
        }
    }

    /// Create a buffer with the default capacity.
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }

    /// Append a record at `counter % capacity` and advance the counter.
    ///
    /// Returns a [`RotationEvent`] exactly when this append fills the
    /// buffer; the counter then wraps to 0 and the storage is reused.
    pub fn append(&mut self, record: Record) -> Option<RotationEvent> {
        let batch_name = record.batch_name();
        self.slots[self.counter] = Some(record);
        self.counter += 1;

        if self.counter < self.capacity {
            return None;
        }

        self.counter = 0;
        let records = self
            .slots
            .iter()
            .flatten()
            .cloned()
            .collect::<Vec<_>>();
        Some(RotationEvent {
            batch_name,
            records,
        })
    }

    /// Cycle counter, always `appends % capacity`.
    pub fn counter(&self) -> usize {
        self.counter
    }

    /// Buffer capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots holding a record from the current fill cycle or a previous one.
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use proptest::prelude::*;

    fn record(i: usize) -> Record {
        let base = Utc.with_ymd_and_hms(2021, 6, 1, 10, 0, 0).unwrap();
        let mut r = Record::unread(base + Duration::seconds(i as i64));
        r.voltage_off = i as f64;
        r
    }

    #[test]
    fn rotation_fires_exactly_on_capacity() {
        let mut buffer = BatchBuffer::new(3);
        assert!(buffer.append(record(0)).is_none());
        assert!(buffer.append(record(1)).is_none());
        let event = buffer.append(record(2)).unwrap();
        assert_eq!(event.records.len(), 3);
        assert_eq!(buffer.counter(), 0);
    }

    #[test]
    fn snapshot_preserves_insertion_order() {
        let mut buffer = BatchBuffer::new(4);
        let mut event = None;
        for i in 0..4 {
            event = buffer.append(record(i));
        }
        let event = event.unwrap();
        for (i, r) in event.records.iter().enumerate() {
            assert_eq!(r.voltage_off, i as f64);
        }
    }

    #[test]
    fn batch_name_comes_from_last_record() {
        let mut buffer = BatchBuffer::new(2);
        buffer.append(record(0));
        let event = buffer.append(record(61)).unwrap();
        // 10:00:00 + 61 s lands in the 10:01 minute
        assert_eq!(event.batch_name, "20210601_10_01");
    }

    #[test]
    fn storage_is_reused_across_batches() {
        let mut buffer = BatchBuffer::new(2);
        buffer.append(record(0));
        buffer.append(record(1));
        buffer.append(record(2));
        let event = buffer.append(record(3)).unwrap();
        assert_eq!(event.records[0].voltage_off, 2.0);
        assert_eq!(event.records[1].voltage_off, 3.0);
    }

    proptest! {
        #[test]
        fn counter_tracks_appends_modulo_capacity(
            capacity in 1usize..50,
            appends in 0usize..200,
        ) {
            let mut buffer = BatchBuffer::new(capacity);
            let mut rotations = 0usize;
            for i in 0..appends {
                if buffer.append(record(i)).is_some() {
                    rotations += 1;
                }
                prop_assert_eq!(buffer.counter(), (i + 1) % capacity);
            }
            prop_assert_eq!(rotations, appends / capacity);
            if appends < capacity {
                prop_assert_eq!(buffer.occupied(), appends.min(capacity));
            }
        }
    }
}
