//! # HALO-HAL: Bit-packed observation records
//!
//! This crate reads and writes `.HAL` archives, the compact binary format
//! used by the HALO observation database. Each record packs one halo sighting
//! from about 100 bytes of natural representation into 22 or 23 bytes plus a
//! length-prefixed remark of up to 60 bytes.
//!
//! ## Features
//!
//! - **Field table**: per-field widths and "unknown" codes in [`fields`],
//!   shared by encoder and decoder
//! - **Observer escape**: observer IDs above 99 are stored in an extra byte
//! - **Stream framing**: [`RecordStream`] walks a headerless archive and
//!   reports the byte offset of any corrupt record
//! - **Raw remarks**: remark bytes are never re-encoded
//!
//! ## Record layout
//!
//! ```text
//! [8 vers][7 KK|0][3 O]([8 KK] if escaped)
//! [7 JJ][4 MM][5 TT][2 g][5 ZS][6 ZM][3 d][7 DD][4 N][3 C][4 c]
//! [7 EE][3 H][3 F][2 V][4 f][7 zz][7 GG][7 HO][7 HU]
//! [15 x 4 sectors] -- pad to byte --
//! [8 remark length][remark bytes]
//! ```
//!
//! ## Example
//!
//! ```rust
//! use halo_hal::{Observation, decode, encode};
//!
//! let obs = Observation {
//!     observer: 44,
//!     object: 1,
//!     year: 98,
//!     month: 3,
//!     day: 14,
//!     halo_type: 1,
//!     brightness: -1,
//!     region: 11,
//!     ..Observation::default()
//! }
//! .with_remarks("bright 22° ring");
//!
//! let bytes = encode(&obs);
//! let (decoded, consumed) = decode(&bytes).unwrap();
//! assert_eq!(decoded, obs);
//! assert_eq!(consumed, bytes.len());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod decode;
pub mod encode;
pub mod fields;
mod observation;
mod stream;

pub use decode::{RecordDecoder, RecordLayout, decode};
pub use encode::{RecordEncoder, encode};
pub use halo_core::{HaloError, Result};
pub use observation::{FORMAT_VERSION, MAX_REMARK_LEN, Observation, Remark, Sectors};
pub use stream::{RecordStream, RecordWriter, STREAM_LOOKAHEAD};

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Read every observation from a `.HAL` file.
///
/// Fails with [`HaloError::InvalidRecord`] at the first corrupt record; no
/// partial list is returned in that case.
pub fn read_observations(path: impl AsRef<Path>) -> Result<Vec<Observation>> {
    let file = File::open(path.as_ref())?;
    let stream = RecordStream::new(BufReader::new(file));
    stream.collect()
}

/// Write observations to a `.HAL` file, replacing its contents.
pub fn write_observations(path: impl AsRef<Path>, observations: &[Observation]) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = RecordWriter::new(BufWriter::new(file));
    writer.write_all(observations)?;
    writer.into_inner()?;
    Ok(())
}
