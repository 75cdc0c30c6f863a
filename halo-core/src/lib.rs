//! # HALO Core
//!
//! Core components for reading and writing HALO observation archives.
//!
//! - [`bitstream`]: LSB-first bit packing over byte buffers
//! - [`error`]: Error types shared by the record codec and the file layer
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L3: Tools                                               │
//! │     halo CLI (list, info, test, repack)                 │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: Record codec                                        │
//! │     Observation, field table, encoder/decoder, stream   │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: BitStream (this crate)                              │
//! │     BitReader/BitWriter, HaloError                      │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use halo_core::bitstream::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! writer.write_bits(25, 8);
//! writer.write_bits(42, 7);
//! let bytes = writer.flush();
//! assert_eq!(bytes.len(), 2);
//!
//! let mut reader = BitReader::new(&bytes);
//! assert_eq!(reader.read_bits(8).unwrap(), 25);
//! assert_eq!(reader.read_bits(7).unwrap(), 42);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod bitstream;
pub mod error;

// Re-exports for convenience
pub use bitstream::{BitReader, BitWriter};
pub use error::{HaloError, Result};
