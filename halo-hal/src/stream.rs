//! Sequential record reading and writing.
//!
//! A `.HAL` archive is a plain concatenation of records with no header and no
//! record count. [`RecordStream`] walks such an archive by decoding one record
//! at a time from a small lookahead window and advancing by the number of
//! bytes the decoder reports.
//!
//! # Stream states
//!
//! - a record decodes: it is yielded and the cursor advances;
//! - too few bytes remain for another record: the stream ends normally, any
//!   leftover bytes are reported by [`RecordStream::trailing_bytes`];
//! - the last record was cut off inside its remark (an interrupted write):
//!   the stream ends normally as well;
//! - anything else: one [`HaloError::InvalidRecord`] carrying the byte offset
//!   is yielded and the stream stops. It never skips ahead.
//!
//! # Example
//!
//! ```
//! use halo_hal::{Observation, RecordStream, RecordWriter};
//!
//! let mut writer = RecordWriter::new(Vec::new());
//! writer.write(&Observation { observer: 12, object: 1, ..Observation::default() }).unwrap();
//! writer.write(&Observation { observer: 130, object: 2, ..Observation::default() }).unwrap();
//! let archive = writer.into_inner().unwrap();
//!
//! let observers: Vec<u8> = RecordStream::from_bytes(&archive)
//!     .map(|obs| obs.unwrap().observer)
//!     .collect();
//! assert_eq!(observers, [12, 130]);
//! ```

use crate::decode::RecordDecoder;
use crate::encode::RecordEncoder;
use crate::observation::{MAX_REMARK_LEN, Observation};
use halo_core::{HaloError, Result};
use log::{debug, warn};
use std::io::{self, Read, Write};

/// Bytes read ahead of the cursor before each decode.
///
/// Covers the largest possible record (escaped region, length byte and a
/// 60-byte remark).
pub const STREAM_LOOKAHEAD: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Reading,
    Finished,
}

/// Iterator over the records of an archive.
#[derive(Debug)]
pub struct RecordStream<R: Read> {
    reader: R,
    decoder: RecordDecoder,
    /// Bytes from the cursor onwards.
    window: Vec<u8>,
    /// Whether the reader has reported end of file.
    source_exhausted: bool,
    /// Byte offset of `window[0]` in the archive.
    offset: u64,
    records_read: usize,
    trailing: usize,
    state: State,
}

impl<'a> RecordStream<&'a [u8]> {
    /// Create a stream over an in-memory archive.
    pub fn from_bytes(data: &'a [u8]) -> Self {
        Self::new(data)
    }
}

impl<R: Read> RecordStream<R> {
    /// Create a stream reading records from `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            decoder: RecordDecoder::new(),
            window: Vec::with_capacity(STREAM_LOOKAHEAD),
            source_exhausted: false,
            offset: 0,
            records_read: 0,
            trailing: 0,
            state: State::Reading,
        }
    }

    /// Byte offset of the next record.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Number of records decoded so far.
    pub fn records_read(&self) -> usize {
        self.records_read
    }

    /// Bytes left over after the last complete record.
    ///
    /// Only meaningful once the stream has finished.
    pub fn trailing_bytes(&self) -> usize {
        self.trailing
    }

    /// Whether the stream has stopped producing records.
    pub fn is_finished(&self) -> bool {
        self.state == State::Finished
    }

    /// Consume the stream and return the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Top the window up to the lookahead size.
    fn fill_window(&mut self) -> io::Result<()> {
        let mut chunk = [0u8; STREAM_LOOKAHEAD];
        while !self.source_exhausted && self.window.len() < STREAM_LOOKAHEAD {
            let wanted = STREAM_LOOKAHEAD - self.window.len();
            match self.reader.read(&mut chunk[..wanted]) {
                Ok(0) => self.source_exhausted = true,
                Ok(n) => self.window.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> Option<Result<Observation>> {
        self.state = State::Finished;
        None
    }

    fn next_record(&mut self) -> Option<Result<Observation>> {
        if let Err(e) = self.fill_window() {
            self.state = State::Finished;
            return Some(Err(e.into()));
        }

        match self.decoder.decode(&self.window) {
            Ok((obs, consumed)) => {
                debug!(
                    "record {} at offset {}: {} bytes",
                    self.records_read, self.offset, consumed
                );
                self.window.drain(..consumed);
                self.offset += consumed as u64;
                self.records_read += 1;
                Some(Ok(obs))
            }
            Err(err) if err.is_end_of_stream() => {
                self.trailing = self.window.len();
                if self.trailing > 0 {
                    warn!(
                        "ignoring {} trailing bytes at offset {}",
                        self.trailing, self.offset
                    );
                }
                self.finish()
            }
            Err(HaloError::MalformedRemark { length, available })
                if self.source_exhausted && length <= MAX_REMARK_LEN =>
            {
                self.trailing = self.window.len();
                warn!(
                    "last record at offset {} is cut off: remark needs {} bytes, {} present",
                    self.offset, length, available
                );
                self.finish()
            }
            Err(err) => {
                self.state = State::Finished;
                Some(Err(HaloError::at_offset(self.offset, err)))
            }
        }
    }
}

impl<R: Read> Iterator for RecordStream<R> {
    type Item = Result<Observation>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.state {
            State::Reading => self.next_record(),
            State::Finished => None,
        }
    }
}

/// Sequential writer appending encoded records to a sink.
#[derive(Debug)]
pub struct RecordWriter<W: Write> {
    writer: W,
    encoder: RecordEncoder,
    buffer: Vec<u8>,
    records_written: usize,
    bytes_written: u64,
}

impl<W: Write> RecordWriter<W> {
    /// Create a new record writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            encoder: RecordEncoder::new(),
            buffer: Vec::with_capacity(STREAM_LOOKAHEAD),
            records_written: 0,
            bytes_written: 0,
        }
    }

    /// Encode and append one observation.
    pub fn write(&mut self, obs: &Observation) -> Result<()> {
        self.buffer.clear();
        self.encoder.encode_into(obs, &mut self.buffer);
        self.writer.write_all(&self.buffer)?;
        self.records_written += 1;
        self.bytes_written += self.buffer.len() as u64;
        Ok(())
    }

    /// Encode and append every observation from `observations`.
    pub fn write_all<'a, I>(&mut self, observations: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Observation>,
    {
        for obs in observations {
            self.write(obs)?;
        }
        Ok(())
    }

    /// Number of records written so far.
    pub fn records_written(&self) -> usize {
        self.records_written
    }

    /// Number of bytes written so far.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}
