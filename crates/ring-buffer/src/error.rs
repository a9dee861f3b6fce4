//! Ring Buffer Error Types

use thiserror::Error;

/// Errors that can occur constructing a ring buffer
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RingBufferError {
    /// Capacity of zero cannot hold any sample
    #[error("ring buffer capacity must be greater than zero")]
    InvalidCapacity,
}
