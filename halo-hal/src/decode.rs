//! Record decoder.
//!
//! Decoding happens in two steps. The layout variant is chosen first from the
//! raw bytes: a zero in the 7-bit observer slot (the low 7 bits of byte 1)
//! means an extra full observer byte follows the object type. Only then is the
//! packed region read field by field, followed by the byte-aligned remark.

use crate::fields::{self, FieldSpec, SECTOR_CODE_BITS, SECTOR_LEN, sector_char};
use crate::observation::{MAX_REMARK_LEN, Observation, Remark, Sectors};
use halo_core::{BitReader, HaloError, Result};

/// Mask of the observer slot within byte 1.
const OBSERVER_SLOT_MASK: u8 = 0x7F;

/// Physical layout of one record's packed region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordLayout {
    /// Observer ID stored in the 7-bit slot.
    Standard,
    /// Observer ID stored as a full byte after the object type.
    Escaped,
}

impl RecordLayout {
    /// Determine the layout from the raw record bytes.
    ///
    /// Needs at least the first two bytes.
    pub fn detect(data: &[u8]) -> Result<Self> {
        match data.get(1) {
            Some(byte) if byte & OBSERVER_SLOT_MASK == 0 => Ok(Self::Escaped),
            Some(_) => Ok(Self::Standard),
            None => Err(HaloError::truncated(fields::FIXED_REGION_LEN, data.len())),
        }
    }

    /// Size of the packed region in bytes.
    pub fn region_len(self) -> usize {
        match self {
            Self::Standard => fields::FIXED_REGION_LEN,
            Self::Escaped => fields::ESCAPED_REGION_LEN,
        }
    }
}

/// Decoder for single observation records.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordDecoder;

impl RecordDecoder {
    /// Create a new decoder.
    pub fn new() -> Self {
        Self
    }

    /// Decode the record at the start of `data`.
    ///
    /// Returns the observation and the number of bytes the record occupies,
    /// so a caller can step to the next record. Bytes after the record are
    /// ignored.
    pub fn decode(&self, data: &[u8]) -> Result<(Observation, usize)> {
        if data.len() < fields::FIXED_REGION_LEN {
            return Err(HaloError::truncated(fields::FIXED_REGION_LEN, data.len()));
        }

        let layout = RecordLayout::detect(data)?;
        let region_len = layout.region_len();
        if data.len() < region_len {
            return Err(HaloError::truncated(region_len, data.len()));
        }

        let obs = self.decode_region(&data[..region_len], layout)?;
        let remarks = read_remark(data, region_len)?;
        let consumed = region_len + 1 + remarks.len();

        Ok((Observation { remarks, ..obs }, consumed))
    }

    fn decode_region(&self, region: &[u8], layout: RecordLayout) -> Result<Observation> {
        let mut reader = BitReader::new(region);

        let version = take(&mut reader, &fields::VERSION)? as u8;
        let slot = take(&mut reader, &fields::OBSERVER)? as u8;
        let object = take(&mut reader, &fields::OBJECT)? as u8;
        let observer = match layout {
            RecordLayout::Escaped => take(&mut reader, &fields::OBSERVER_ESCAPE)? as u8,
            RecordLayout::Standard => slot,
        };

        let year = take(&mut reader, &fields::YEAR)? as u8;
        let month = take(&mut reader, &fields::MONTH)? as u8;
        let day = take(&mut reader, &fields::DAY)? as u8;
        let site = take(&mut reader, &fields::SITE)? as u8;
        let hour = take(&mut reader, &fields::HOUR)? as u8;
        let minute = take(&mut reader, &fields::MINUTE)? as u8;

        let origin = take(&mut reader, &fields::ORIGIN)? as u8;
        let duration = take(&mut reader, &fields::DURATION)? as u8;
        let cloud_cover = take(&mut reader, &fields::CLOUD_COVER)? as u8;
        let cirrus = take(&mut reader, &fields::CIRRUS)? as u8;
        let low_clouds = take(&mut reader, &fields::LOW_CLOUDS)? as u8;

        let halo_type = take(&mut reader, &fields::HALO_TYPE)? as u8;
        let brightness = take(&mut reader, &fields::BRIGHTNESS)? as i8;
        let color = take(&mut reader, &fields::COLOR)? as i8;
        let completeness = take(&mut reader, &fields::COMPLETENESS)? as i8;
        let front = take(&mut reader, &fields::FRONT)? as i8;
        let precipitation = take(&mut reader, &fields::PRECIPITATION)? as i8;
        let region_code = take(&mut reader, &fields::REGION)? as u8;
        let upper_pillar = take(&mut reader, &fields::UPPER_PILLAR)? as i8;
        let lower_pillar = take(&mut reader, &fields::LOWER_PILLAR)? as i8;

        let mut sector_text = String::with_capacity(SECTOR_LEN);
        for _ in 0..SECTOR_LEN {
            sector_text.push(sector_char(reader.read_bits(SECTOR_CODE_BITS)?));
        }

        debug_assert_eq!(reader.byte_position(), layout.region_len());

        Ok(Observation {
            version,
            observer,
            object,
            year,
            month,
            day,
            site,
            hour,
            minute,
            origin,
            duration,
            cloud_cover,
            cirrus,
            low_clouds,
            halo_type,
            brightness,
            color,
            completeness,
            front,
            precipitation,
            region: region_code,
            upper_pillar,
            lower_pillar,
            sectors: Sectors::new(&sector_text),
            remarks: Remark::default(),
        })
    }
}

#[inline]
fn take(reader: &mut BitReader<'_>, spec: &FieldSpec) -> Result<i16> {
    Ok(spec.value(reader.read_bits(spec.width)?))
}

/// Read the length-prefixed remark that starts at `offset`.
fn read_remark(data: &[u8], offset: usize) -> Result<Remark> {
    let Some(&length) = data.get(offset) else {
        return Err(HaloError::truncated(offset + 1, data.len()));
    };
    let length = length as usize;
    let available = data.len() - offset - 1;

    if length > MAX_REMARK_LEN || length > available {
        return Err(HaloError::malformed_remark(length, available));
    }

    let start = offset + 1;
    Ok(Remark::new(&data[start..start + length]))
}

/// Decode one record (convenience function).
pub fn decode(data: &[u8]) -> Result<(Observation, usize)> {
    RecordDecoder::new().decode(data)
}
