use bytes::BytesMut;
use thiserror::Error;

use super::optneg::CompatibilityError;

/// Everything that can go wrong taking a command payload apart
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Data that could not be interpreted
    #[error(transparent)]
    InvalidData(#[from] InvalidData),
    /// Clearly not enough data was present
    #[error(transparent)]
    NotEnoughData(#[from] NotEnoughData),
    /// The option negotiation can not be agreed upon
    #[error(transparent)]
    CompatibilityError(#[from] CompatibilityError),
}

/// Error when receiving bogus data from the MTA
#[derive(Debug, Error)]
#[error("{item}: {msg}")]
pub struct InvalidData {
    /// The command the data was meant for
    pub item: &'static str,
    /// A human readable message
    pub msg: &'static str,
    /// The data that was invalid
    pub offending_bytes: BytesMut,
}

impl InvalidData {
    /// Create a new `InvalidData` error
    #[must_use]
    pub fn new(item: &'static str, msg: &'static str, offending_bytes: BytesMut) -> Self {
        Self {
            item,
            msg,
            offending_bytes,
        }
    }

    /// Bytes were left over after the last field of `item`.
    #[must_use]
    pub fn trailing(item: &'static str, offending_bytes: BytesMut) -> Self {
        Self::new(item, "trailing bytes after the last field", offending_bytes)
    }
}

/// Raised when a fixed size field is cut short
#[derive(Debug, Error)]
#[error("{item}: expected '{expected}' bytes but got only '{got}': {msg}")]
pub struct NotEnoughData {
    /// The command that is missing data
    pub item: &'static str,
    /// Human readable message
    pub msg: &'static str,
    /// How many bytes where expected
    pub expected: usize,
    /// How many bytes where available
    pub got: usize,
    /// The problematic bytes
    pub buffer: BytesMut,
}

impl NotEnoughData {
    /// Create a new `NotEnoughData` error
    #[must_use]
    pub fn new(item: &'static str, msg: &'static str, expected: usize, buffer: BytesMut) -> Self {
        Self {
            item,
            msg,
            expected,
            got: buffer.len(),
            buffer,
        }
    }
}
