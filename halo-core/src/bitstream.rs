//! Bit-level I/O over in-memory byte buffers.
//!
//! This module provides `BitWriter` and `BitReader` for packing record fields
//! of arbitrary width into bytes and reading them back.
//!
//! # Bit Ordering
//!
//! HALO records use LSB-first ordering within bytes: the first bit written
//! lands in bit 0 of the first byte, and a multi-bit value is emitted starting
//! from its least significant bit.
//!
//! # Example
//!
//! ```
//! use halo_core::bitstream::{BitReader, BitWriter};
//!
//! // Writing bits
//! let mut writer = BitWriter::new();
//! writer.write_bits(0b101, 3); // Write 3 bits
//! writer.write_bits(0b1100, 4); // Write 4 bits
//! let output = writer.flush();
//!
//! // Reading bits
//! let mut reader = BitReader::new(&output);
//! assert_eq!(reader.read_bits(3).unwrap(), 0b101);
//! assert_eq!(reader.read_bits(4).unwrap(), 0b1100);
//! ```

use crate::error::{HaloError, Result};

/// A bit-level writer that accumulates into an owned byte buffer.
///
/// Bits are collected in a 64-bit accumulator and moved to the output as
/// whole bytes. [`flush`](Self::flush) consumes the writer, so nothing can be
/// written after the final byte has been padded.
#[derive(Debug, Default)]
pub struct BitWriter {
    /// Completed output bytes.
    bytes: Vec<u8>,
    /// Bit buffer (LSB-first).
    buffer: u64,
    /// Number of bits in buffer.
    bits_in_buffer: u8,
    /// Total bits written.
    total_bits_written: u64,
}

impl BitWriter {
    /// Create a new, empty `BitWriter`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a `BitWriter` with room for `capacity` output bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Get the total number of bits written so far.
    pub fn bits_written(&self) -> u64 {
        self.total_bits_written
    }

    /// Move complete bytes from the accumulator to the output.
    #[inline]
    fn drain_bytes(&mut self) {
        while self.bits_in_buffer >= 8 {
            self.bytes.push((self.buffer & 0xFF) as u8);
            self.buffer >>= 8;
            self.bits_in_buffer -= 8;
        }
    }

    /// Write the low `count` bits of `value` (0-32 bits, LSB-first).
    ///
    /// Higher bits of `value` are dropped silently; archives written by older
    /// tools depend on this truncation. Debug builds assert that nothing was
    /// dropped so that out-of-range input can be caught while validating.
    #[inline]
    pub fn write_bits(&mut self, value: u32, count: u8) {
        debug_assert!(count <= 32, "Cannot write more than 32 bits at once");

        if count == 0 {
            return;
        }

        let mask = if count == 32 {
            u32::MAX
        } else {
            (1u32 << count).wrapping_sub(1)
        };
        debug_assert!(
            value & !mask == 0,
            "value {value} does not fit in {count} bits"
        );
        let value = value & mask;

        self.buffer |= (value as u64) << self.bits_in_buffer;
        self.bits_in_buffer += count;
        self.total_bits_written += count as u64;

        self.drain_bytes();
    }

    /// Pad the partial final byte with zeros and return the output bytes.
    pub fn flush(mut self) -> Vec<u8> {
        if self.bits_in_buffer % 8 != 0 {
            let padding = 8 - (self.bits_in_buffer % 8);
            self.bits_in_buffer += padding;
        }
        self.drain_bytes();
        self.bytes
    }
}

/// A bit-level reader over a borrowed byte slice.
///
/// Reads never go past the end of the slice: an underrun returns
/// [`HaloError::UnexpectedEndOfData`] and leaves the cursor where it was.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    /// Input bytes.
    data: &'a [u8],
    /// Cursor, in bits from the start of `data`.
    bit_pos: usize,
}

impl<'a> BitReader<'a> {
    /// Create a new `BitReader` positioned at the first bit of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, bit_pos: 0 }
    }

    /// Get the current bit position (for error reporting).
    pub fn bit_position(&self) -> u64 {
        self.bit_pos as u64
    }

    /// Index of the first byte not touched by the cursor.
    ///
    /// A partially consumed byte counts as consumed.
    pub fn byte_position(&self) -> usize {
        self.bit_pos.div_ceil(8)
    }

    /// Number of unread bits.
    pub fn remaining_bits(&self) -> usize {
        self.data.len() * 8 - self.bit_pos
    }

    /// Extract `count` bits at the cursor. Callers verify the range first.
    fn extract(&self, count: u8) -> u32 {
        let mut value = 0u64;
        let mut filled = 0u32;
        let mut pos = self.bit_pos;
        let end = pos + count as usize;

        while pos < end {
            let byte = self.data[pos / 8] as u64;
            let shift = pos % 8;
            let take = (8 - shift).min(end - pos);
            let chunk = (byte >> shift) & ((1u64 << take) - 1);
            value |= chunk << filled;
            filled += take as u32;
            pos += take;
        }

        value as u32
    }

    /// Read up to 32 bits from the stream.
    ///
    /// # Arguments
    ///
    /// * `count` - Number of bits to read (0-32)
    ///
    /// # Returns
    ///
    /// The bits read as a u32, with the first bit read in the LSB position.
    #[inline]
    pub fn read_bits(&mut self, count: u8) -> Result<u32> {
        let value = self.peek_bits(count)?;
        self.bit_pos += count as usize;
        Ok(value)
    }

    /// Peek at up to 32 bits without consuming them.
    pub fn peek_bits(&self, count: u8) -> Result<u32> {
        debug_assert!(count <= 32, "Cannot read more than 32 bits at once");

        if count == 0 {
            return Ok(0);
        }
        if self.remaining_bits() < count as usize {
            return Err(HaloError::unexpected_end(self.bit_position()));
        }

        Ok(self.extract(count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Record head: version 25, observer 42, object 3.
    const HEAD: [u8; 2] = [0x19, 0xAA];

    #[test]
    fn test_bitreader_record_head() {
        let mut reader = BitReader::new(&HEAD);

        assert_eq!(reader.read_bits(8).unwrap(), 25);
        // Observer slot is the low 7 bits of byte 1; the object type starts
        // in its top bit.
        assert_eq!(reader.peek_bits(7).unwrap(), 42);
        assert_eq!(reader.read_bits(7).unwrap(), 42);
        assert_eq!(reader.bit_position(), 15);
        assert_eq!(reader.byte_position(), 2);
        assert_eq!(reader.remaining_bits(), 1);
    }

    #[test]
    fn test_escaped_head_crosses_bytes() {
        let mut writer = BitWriter::new();
        writer.write_bits(25, 8);
        writer.write_bits(0, 7);
        writer.write_bits(5, 3);
        writer.write_bits(137, 8);
        assert_eq!(writer.bits_written(), 26);
        let output = writer.flush();
        // Empty slot leaves only the object's low bit in byte 1; the escape
        // byte starts at bit 2 of byte 2.
        assert_eq!(output, vec![0x19, 0x80, 0x26, 0x02]);

        let mut reader = BitReader::new(&output);
        assert_eq!(reader.read_bits(8).unwrap(), 25);
        assert_eq!(reader.read_bits(7).unwrap(), 0);
        assert_eq!(reader.read_bits(3).unwrap(), 5);
        assert_eq!(reader.read_bits(8).unwrap(), 137);
        assert_eq!(reader.byte_position(), 4);
    }

    #[test]
    fn test_bitreader_underrun_is_recoverable() {
        let data = [0x12, 0x34];
        let mut reader = BitReader::new(&data);

        assert_eq!(reader.read_bits(10).unwrap(), 0x012);
        let err = reader.read_bits(7).unwrap_err();
        assert!(matches!(
            err,
            HaloError::UnexpectedEndOfData { bit_position: 10 }
        ));

        // Cursor did not move, the remaining 6 bits are still readable.
        assert_eq!(reader.remaining_bits(), 6);
        assert_eq!(reader.read_bits(6).unwrap(), 0x34 >> 2);
        assert!(reader.peek_bits(1).is_err());
        assert_eq!(reader.read_bits(0).unwrap(), 0);
    }

    #[test]
    fn test_sector_codes_pack_two_per_byte() {
        // "1-3/" as 4-bit codes.
        let codes = [1u32, 10, 3, 9];
        let mut writer = BitWriter::with_capacity(2);
        for code in codes {
            writer.write_bits(code, 4);
        }
        let output = writer.flush();
        assert_eq!(output, vec![0xA1, 0x93]);

        let mut reader = BitReader::new(&output);
        for code in codes {
            assert_eq!(reader.read_bits(4).unwrap(), code);
        }
    }

    #[test]
    fn test_bitwriter_pads_partial_byte() {
        // 175-bit region ends one bit short of 22 bytes.
        let mut writer = BitWriter::with_capacity(22);
        for _ in 0..25 {
            writer.write_bits(0x7F, 7);
        }
        assert_eq!(writer.bits_written(), 175);
        let output = writer.flush();
        assert_eq!(output.len(), 22);
        assert_eq!(output[21], 0x7F);
        assert!(output[..21].iter().all(|&b| b == 0xFF));

        assert!(BitWriter::new().flush().is_empty());
    }

    #[test]
    fn test_bitwriter_full_width() {
        let mut writer = BitWriter::new();
        writer.write_bits(0xDEADBEEF, 32);
        writer.write_bits(0x5, 3);
        let output = writer.flush();
        assert_eq!(output, vec![0xEF, 0xBE, 0xAD, 0xDE, 0x05]);

        let mut reader = BitReader::new(&output);
        assert_eq!(reader.read_bits(32).unwrap(), 0xDEADBEEF);
        assert_eq!(reader.read_bits(3).unwrap(), 0x5);
    }

    #[test]
    fn test_unknown_codes_roundtrip() {
        // H, F, V, f, zz all "unknown".
        let fields = [(7u32, 3u8), (7, 3), (3, 2), (15, 4), (127, 7)];
        let mut writer = BitWriter::new();
        for (code, width) in fields {
            writer.write_bits(code, width);
        }
        let output = writer.flush();
        assert_eq!(output.len(), 3);

        let mut reader = BitReader::new(&output);
        for (code, width) in fields {
            assert_eq!(reader.read_bits(width).unwrap(), code);
        }
        // Padding bits are zero.
        assert_eq!(reader.read_bits(5).unwrap(), 0);
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn test_bitwriter_truncates_in_release() {
        let mut writer = BitWriter::new();
        writer.write_bits(160, 7);
        assert_eq!(writer.flush(), vec![160 & 0x7F]);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "does not fit")]
    fn test_bitwriter_asserts_on_truncation_in_debug() {
        let mut writer = BitWriter::new();
        writer.write_bits(160, 7);
    }
}
