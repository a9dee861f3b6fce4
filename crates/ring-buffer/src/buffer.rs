//! Mutex-Guarded Ring Buffer Implementation

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::index::{advance, forward_distance, physical, predecessor};
use crate::{RingBufferError, Sample, Timestamped};

/// Default buffer capacity (500 samples ≈ 5 s of history at 100 Hz)
pub const DEFAULT_CAPACITY: usize = 500;

/// Result of a closest-timestamp lookup
#[derive(Debug, Clone)]
pub struct ClosestMatch<T> {
    /// The sample nearest the query timestamp
    pub sample: Sample<T>,
    /// False when the query fell outside covered history and the nearest
    /// boundary sample was returned instead of a true bracket
    pub in_range: bool,
}

/// Lock-protected state: the circular slot array and its cursors.
///
/// `slots` grows by push until it reaches capacity, so before the first
/// wrap the valid run is simply `slots[0..=head]`. Once `full`, the run
/// is `slots[head+1..=head]` circularly, oldest at `head+1`.
struct Inner<T> {
    slots: Vec<Sample<T>>,
    head: usize,
    full: bool,
    total_inserted: u64,
    total_rejected: u64,
}

impl<T> Inner<T> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            head: 0,
            full: false,
            total_inserted: 0,
            total_rejected: 0,
        }
    }

    /// Physical index of the oldest valid slot. Meaningless when empty.
    fn oldest_index(&self, capacity: usize) -> usize {
        if self.full {
            advance(self.head, capacity)
        } else {
            0
        }
    }

    fn oldest_timestamp(&self, capacity: usize) -> Option<f64> {
        if self.slots.is_empty() {
            return None;
        }
        Some(self.slots[self.oldest_index(capacity)].timestamp)
    }

    /// Timestamp of the slot `offset` steps forward of the oldest.
    fn stamp_at(&self, oldest: usize, offset: usize, capacity: usize) -> f64 {
        self.slots[physical(oldest, offset, capacity)].timestamp
    }

    /// Walk the newly written head sample backwards through the valid run
    /// while it is strictly younger than its circular predecessor. Bounded
    /// by the run start; restores the non-decreasing invariant for
    /// near-neighbor arrival inversions.
    fn repair_order(&mut self, capacity: usize) {
        let oldest = self.oldest_index(capacity);
        let mut at = self.head;
        while at != oldest {
            let prev = predecessor(at, capacity);
            if self.slots[at].timestamp >= self.slots[prev].timestamp {
                break;
            }
            self.slots.swap(at, prev);
            at = prev;
        }
    }

    /// Closest-match search. Returns the physical slot index and whether
    /// the query timestamp was inside covered history.
    ///
    /// The circular run is linearized to logical offsets from the oldest
    /// slot before searching, so the iterative bisection never sees the
    /// wrap boundary.
    fn closest_index(&self, timestamp: f64, capacity: usize) -> Option<(usize, bool)> {
        if self.slots.is_empty() {
            return None;
        }

        let oldest = self.oldest_index(capacity);
        let newest = self.head;
        if self.slots[oldest].timestamp > timestamp {
            return Some((oldest, false));
        }
        if self.slots[newest].timestamp < timestamp {
            return Some((newest, false));
        }

        let mut low = 0;
        let mut high = self.slots.len() - 1;
        while high - low > 1 {
            let mid = low + (high - low) / 2;
            if self.stamp_at(oldest, mid, capacity) > timestamp {
                high = mid;
            } else {
                low = mid;
            }
        }

        // Adjacent candidates bracket the query; ties go to the earlier one.
        let low_diff = (timestamp - self.stamp_at(oldest, low, capacity)).abs();
        let high_diff = (self.stamp_at(oldest, high, capacity) - timestamp).abs();
        let offset = if low_diff <= high_diff { low } else { high };
        Some((physical(oldest, offset, capacity), true))
    }
}

impl<T: Clone> Inner<T> {
    /// Clone out every sample from `start_at` to `end_at` inclusive,
    /// oldest to newest. Offsets are compared logically so a span that
    /// crosses the physical wrap point walks forward through the run
    /// rather than through invalid slots; a reversed span is empty.
    fn collect_span(&self, start_at: usize, end_at: usize, capacity: usize) -> Vec<Sample<T>> {
        let oldest = self.oldest_index(capacity);
        let start_off = forward_distance(oldest, start_at, capacity);
        let end_off = forward_distance(oldest, end_at, capacity);
        if start_off > end_off {
            return Vec::new();
        }
        (start_off..=end_off)
            .map(|off| self.slots[physical(oldest, off, capacity)].clone())
            .collect()
    }
}

/// Fixed-capacity, timestamp-ordered circular buffer.
///
/// One buffer holds the recent history of a single sensor stream. Inserts
/// overwrite the oldest sample once capacity is reached and re-order the
/// run locally to tolerate slightly out-of-order arrival. Every public
/// operation takes the single internal mutex for its full duration, so a
/// reader that completes after an insert is guaranteed to observe it.
pub struct TimedRingBuffer<T> {
    /// Fixed at construction, immutable for the buffer's lifetime
    capacity: usize,
    inner: Mutex<Inner<T>>,
}

impl<T> TimedRingBuffer<T> {
    /// Create a buffer holding at most `capacity` samples.
    pub fn new(capacity: usize) -> Result<Self, RingBufferError> {
        if capacity == 0 {
            return Err(RingBufferError::InvalidCapacity);
        }
        Ok(Self {
            capacity,
            inner: Mutex::new(Inner::with_capacity(capacity)),
        })
    }

    /// Create a buffer with the default per-stream capacity (500 samples).
    pub fn with_default_capacity() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            inner: Mutex::new(Inner::with_capacity(DEFAULT_CAPACITY)),
        }
    }

    // Every write leaves the run consistent before the guard drops, so a
    // lock poisoned by a panicking reader is still safe to reuse.
    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Buffer capacity in samples.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of samples currently held.
    pub fn size(&self) -> usize {
        self.lock().slots.len()
    }

    /// True when no sample is held.
    pub fn is_empty(&self) -> bool {
        self.lock().slots.is_empty()
    }

    /// True once the buffer has wrapped at least once.
    pub fn is_full(&self) -> bool {
        self.lock().full
    }

    /// Fill ratio (0.0 to 1.0).
    pub fn fill_ratio(&self) -> f64 {
        self.size() as f64 / self.capacity as f64
    }

    /// Samples accepted over the buffer's lifetime (for statistics).
    pub fn total_inserted(&self) -> u64 {
        self.lock().total_inserted
    }

    /// Samples dropped for arriving older than the retained history.
    pub fn total_rejected(&self) -> u64 {
        self.lock().total_rejected
    }

    /// Reset to the empty state. Lifetime statistics are kept.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.slots.clear();
        inner.head = 0;
        inner.full = false;
    }

    #[cfg(test)]
    fn stamps(&self) -> Vec<f64> {
        let inner = self.lock();
        let oldest = inner.oldest_index(self.capacity);
        (0..inner.slots.len())
            .map(|off| inner.stamp_at(oldest, off, self.capacity))
            .collect()
    }
}

impl<T: Timestamped + Clone> TimedRingBuffer<T> {
    /// Insert one sample, evicting the oldest if the buffer is full.
    ///
    /// A sample timestamped strictly earlier than the oldest retained
    /// sample is outside the supported disorder tolerance and is dropped;
    /// the drop is counted and logged at debug level.
    pub fn insert(&self, value: T) {
        let sample = Sample {
            timestamp: value.timestamp(),
            value,
        };
        let mut inner = self.lock();

        if let Some(oldest) = inner.oldest_timestamp(self.capacity) {
            if sample.timestamp < oldest {
                inner.total_rejected += 1;
                debug!(
                    timestamp = sample.timestamp,
                    oldest, "dropping sample older than retained history"
                );
                return;
            }
        }

        if inner.full {
            inner.head = advance(inner.head, self.capacity);
            let head = inner.head;
            inner.slots[head] = sample;
        } else {
            inner.slots.push(sample);
            inner.head = inner.slots.len() - 1;
            if inner.slots.len() == self.capacity {
                inner.full = true;
            }
        }
        inner.total_inserted += 1;

        inner.repair_order(self.capacity);
    }

    /// Most recently timestamped sample, or `None` when empty.
    pub fn get_latest(&self) -> Option<Sample<T>> {
        let inner = self.lock();
        if inner.slots.is_empty() {
            return None;
        }
        Some(inner.slots[inner.head].clone())
    }

    /// Sample whose timestamp is nearest `timestamp`, or `None` when empty.
    ///
    /// When the query lies before the oldest or after the newest sample,
    /// the boundary sample is returned with `in_range == false`; callers
    /// must check the flag before treating it as a true bracket.
    pub fn get_closest(&self, timestamp: f64) -> Option<ClosestMatch<T>> {
        let inner = self.lock();
        let (idx, in_range) = inner.closest_index(timestamp, self.capacity)?;
        Some(ClosestMatch {
            sample: inner.slots[idx].clone(),
            in_range,
        })
    }

    /// All samples between the closest matches of `start` and `end`,
    /// inclusive, oldest to newest.
    ///
    /// Both bounds must land inside covered history; a window straddling
    /// uncovered history yields the empty vector rather than truncating
    /// to partial coverage.
    pub fn get_period(&self, start: f64, end: f64) -> Vec<Sample<T>> {
        let inner = self.lock();
        let (Some((start_at, true)), Some((end_at, true))) = (
            inner.closest_index(start, self.capacity),
            inner.closest_index(end, self.capacity),
        ) else {
            return Vec::new();
        };
        inner.collect_span(start_at, end_at, self.capacity)
    }

    /// All samples from the closest match of `start` through the newest,
    /// inclusive. Empty when `start` lies outside covered history.
    pub fn get_latest_period(&self, start: f64) -> Vec<Sample<T>> {
        let inner = self.lock();
        let Some((start_at, true)) = inner.closest_index(start, self.capacity) else {
            return Vec::new();
        };
        let head = inner.head;
        inner.collect_span(start_at, head, self.capacity)
    }
}
