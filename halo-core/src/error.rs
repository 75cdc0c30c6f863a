//! Error types for HALO record operations.
//!
//! A single error enum covers bit-level underruns, record framing failures and
//! the I/O errors of the surrounding file layer. [`HaloError::TruncatedRecord`]
//! is special: a stream reader treats it as the normal end of an archive.

use std::io;
use thiserror::Error;

/// The main error type for HALO record operations.
#[derive(Debug, Error)]
pub enum HaloError {
    /// I/O error from underlying reader/writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Fewer bytes available than the record layout requires.
    #[error("Truncated record: need {needed} bytes, have {available}")]
    TruncatedRecord {
        /// Number of bytes the record layout requires.
        needed: usize,
        /// Number of bytes that were available.
        available: usize,
    },

    /// A bit read ran past the end of the buffer.
    #[error("Unexpected end of data at bit position {bit_position}")]
    UnexpectedEndOfData {
        /// Bit position where the read was attempted.
        bit_position: u64,
    },

    /// The remark length byte is out of range or points past the buffer.
    #[error("Malformed remark: declared length {length}, {available} bytes available")]
    MalformedRemark {
        /// Declared remark length.
        length: usize,
        /// Bytes available after the length byte.
        available: usize,
    },

    /// A record inside an archive failed to decode.
    #[error("file load failed at offset {offset}: {source}")]
    InvalidRecord {
        /// Byte offset of the failing record.
        offset: u64,
        /// The underlying decode error.
        #[source]
        source: Box<HaloError>,
    },
}

/// Result type alias for HALO operations.
pub type Result<T> = std::result::Result<T, HaloError>;

impl HaloError {
    /// Create a truncated record error.
    pub fn truncated(needed: usize, available: usize) -> Self {
        Self::TruncatedRecord { needed, available }
    }

    /// Create an unexpected end of data error.
    pub fn unexpected_end(bit_position: u64) -> Self {
        Self::UnexpectedEndOfData { bit_position }
    }

    /// Create a malformed remark error.
    pub fn malformed_remark(length: usize, available: usize) -> Self {
        Self::MalformedRemark { length, available }
    }

    /// Wrap a decode error with the byte offset of the record it came from.
    pub fn at_offset(offset: u64, source: HaloError) -> Self {
        Self::InvalidRecord {
            offset,
            source: Box::new(source),
        }
    }

    /// Whether this error only means "not enough bytes for another record".
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, Self::TruncatedRecord { .. })
    }

    /// Byte offset of the failing record, when known.
    pub fn offset(&self) -> Option<u64> {
        match self {
            Self::InvalidRecord { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}
