//! Bounded top-K selection over a stream of records.
//!
//! [`TopKTracker`] keeps at most `capacity` records in an unordered working
//! set. While the set has room every record is admitted. Once it is full, an
//! incoming record replaces one entry holding the current minimum value, but
//! only when its own value is strictly greater; otherwise it is discarded.
//!
//! The slot of the current minimum is cached and re-derived with a linear scan
//! after each admission, so `offer` costs O(K) in the worst case and memory
//! stays O(K) regardless of stream length.
//!
//! Ordering among records with equal values is unspecified: which duplicate of
//! the minimum gets evicted, and how tied records are ordered in the final
//! report, depends on the working-set layout and must not be relied upon.

use serde::Serialize;
use th_core::{CoreError, Record, Score};

/// Upper bound on the slots reserved up front, so a huge requested capacity
/// does not allocate before any records arrive.
const PREALLOC_LIMIT: usize = 4096;

/// Counters describing the admission decisions made by a tracker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TopKStats {
    /// Records inserted into the working set.
    pub admitted: u64,
    /// Records removed to make room for a larger one.
    pub evicted: u64,
    /// Records discarded because the set was full and they were not larger
    /// than its minimum.
    pub rejected: u64,
}

#[derive(Debug)]
pub struct TopKTracker {
    capacity: usize,
    slots: Vec<Record>,
    min_slot: Option<usize>,
    stats: TopKStats,
}

impl TopKTracker {
    pub fn new(capacity: usize) -> Result<Self, CoreError> {
        if capacity == 0 {
            return Err(CoreError::InvalidCapacity(0));
        }
        Ok(Self {
            capacity,
            slots: Vec::with_capacity(capacity.min(PREALLOC_LIMIT)),
            min_slot: None,
            stats: TopKStats::default(),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() == self.capacity
    }

    pub fn stats(&self) -> TopKStats {
        self.stats
    }

    /// Smallest value currently held, or `None` before the first admission.
    pub fn min_value(&self) -> Option<Score> {
        match self.min_slot {
            Some(slot) => Some(self.slots[slot].value()),
            None => self.slots.iter().map(Record::value).min(),
        }
    }

    /// Feed one record from the stream.
    pub fn offer(&mut self, record: Record) {
        if !self.is_full() {
            self.slots.push(record);
            self.min_slot = None;
            self.stats.admitted += 1;
            return;
        }

        let slot = self.current_min_slot();
        if record.value() > self.slots[slot].value() {
            self.slots[slot] = record;
            self.min_slot = None;
            self.stats.admitted += 1;
            self.stats.evicted += 1;
        } else {
            self.stats.rejected += 1;
        }
    }

    /// Consume the tracker and return the retained labels, highest value first.
    pub fn finalize(self) -> Vec<String> {
        self.finalize_records()
            .into_iter()
            .map(Record::into_label)
            .collect()
    }

    /// Like [`finalize`](Self::finalize), keeping the values next to the labels.
    pub fn finalize_records(self) -> Vec<Record> {
        let mut records = self.slots;
        records.sort_by(|a, b| b.value().cmp(&a.value()));
        records
    }

    fn current_min_slot(&mut self) -> usize {
        if let Some(slot) = self.min_slot {
            return slot;
        }
        // Only called on a full, non-empty working set.
        let slot = self
            .slots
            .iter()
            .enumerate()
            .min_by_key(|(_, record)| record.value())
            .map(|(slot, _)| slot)
            .unwrap_or(0);
        self.min_slot = Some(slot);
        slot
    }
}
