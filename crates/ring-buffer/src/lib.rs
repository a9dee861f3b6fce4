//! Timestamped Ring Buffer
//!
//! Fixed-capacity circular storage for timestamped sensor samples.
//! Each buffer holds the recent history of one asynchronous stream and
//! answers the time queries the fusion stage needs to align streams:
//! latest sample, sample closest to a timestamp, and all samples inside
//! a time window.

mod buffer;
mod error;
mod index;

pub use buffer::{ClosestMatch, TimedRingBuffer, DEFAULT_CAPACITY};
pub use error::RingBufferError;

use serde::{Deserialize, Serialize};

/// Contract a stored value must satisfy: expose the acquisition timestamp
/// (seconds) used as the ordering key. The buffer treats the value as
/// opaque otherwise.
pub trait Timestamped {
    /// Acquisition time in seconds
    fn timestamp(&self) -> f64;
}

/// A stored (timestamp, value) pair.
///
/// The timestamp is copied out of the value at insert time so ordering and
/// search never need to reach into `T`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample<T> {
    /// Ordering key in seconds
    pub timestamp: f64,
    /// The measurement record
    pub value: T,
}
