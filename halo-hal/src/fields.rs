//! Packed field table for the `.HAL` record layout.
//!
//! Every field of the bit-packed region has a fixed width. Some fields reserve
//! one code of that width for "unknown" (stored in memory as `-1`), and the
//! duration-origin field remaps its in-memory value 255 onto code 3. Both the
//! encoder and the decoder translate values through the same [`FieldSpec`]
//! entries so the mapping stays symmetric.
//!
//! The reserved code is always local to its field: code 7 means "unknown" for
//! brightness but is an ordinary value for the cirrus type.

/// Width and reserved codes of one packed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name, as used by observers' paper forms.
    pub name: &'static str,
    /// Width on the wire, in bits.
    pub width: u8,
    /// Code that stands for the in-memory value `-1`.
    pub sentinel: Option<u32>,
    /// Extra `(value, code)` pair mapped in both directions.
    pub remap: Option<(i16, u32)>,
}

impl FieldSpec {
    /// A field stored as-is.
    pub const fn plain(name: &'static str, width: u8) -> Self {
        Self {
            name,
            width,
            sentinel: None,
            remap: None,
        }
    }

    /// A field whose highest code means "unknown".
    pub const fn with_unknown(name: &'static str, width: u8) -> Self {
        Self {
            name,
            width,
            sentinel: Some(Self::max_code_for(width)),
            remap: None,
        }
    }

    /// A field with one value remapped onto a specific code.
    pub const fn with_remap(name: &'static str, width: u8, value: i16, code: u32) -> Self {
        Self {
            name,
            width,
            sentinel: None,
            remap: Some((value, code)),
        }
    }

    const fn max_code_for(width: u8) -> u32 {
        (1u32 << width) - 1
    }

    /// Largest code representable in this field.
    pub const fn max_code(&self) -> u32 {
        Self::max_code_for(self.width)
    }

    /// Translate an in-memory value to its wire code.
    ///
    /// Values outside the field's range are passed through unchanged and are
    /// truncated by the bit writer.
    pub fn code(&self, value: i16) -> u32 {
        if let Some(code) = self.sentinel {
            if value == -1 {
                return code;
            }
        }
        if let Some((special, code)) = self.remap {
            if value == special {
                return code;
            }
        }
        value as i32 as u32
    }

    /// Translate a wire code back to its in-memory value.
    pub fn value(&self, code: u32) -> i16 {
        if self.sentinel == Some(code) {
            return -1;
        }
        if let Some((special, remapped)) = self.remap {
            if code == remapped {
                return special;
            }
        }
        code as i16
    }
}

/// Format version (`vers`).
pub const VERSION: FieldSpec = FieldSpec::plain("vers", 8);
/// Observer ID slot (`KK`); zero announces the escape byte.
pub const OBSERVER: FieldSpec = FieldSpec::plain("KK", 7);
/// Full observer ID following the object type when escaped.
pub const OBSERVER_ESCAPE: FieldSpec = FieldSpec::plain("KK+", 8);
/// Object type (`O`).
pub const OBJECT: FieldSpec = FieldSpec::plain("O", 3);
/// Two-digit year (`JJ`).
pub const YEAR: FieldSpec = FieldSpec::plain("JJ", 7);
/// Month (`MM`).
pub const MONTH: FieldSpec = FieldSpec::plain("MM", 4);
/// Day (`TT`).
pub const DAY: FieldSpec = FieldSpec::plain("TT", 5);
/// Observing site indicator (`g`).
pub const SITE: FieldSpec = FieldSpec::plain("g", 2);
/// Hour (`ZS`).
pub const HOUR: FieldSpec = FieldSpec::plain("ZS", 5);
/// Minute (`ZM`).
pub const MINUTE: FieldSpec = FieldSpec::plain("ZM", 6);
/// Duration origin (`d`); 255 is stored as code 3.
pub const ORIGIN: FieldSpec = FieldSpec::with_remap("d", 3, 255, 3);
/// Duration (`DD`).
pub const DURATION: FieldSpec = FieldSpec::plain("DD", 7);
/// Cloud cover (`N`).
pub const CLOUD_COVER: FieldSpec = FieldSpec::plain("N", 4);
/// Cirrus type (`C`).
pub const CIRRUS: FieldSpec = FieldSpec::plain("C", 3);
/// Low clouds (`c`).
pub const LOW_CLOUDS: FieldSpec = FieldSpec::plain("c", 4);
/// Halo type (`EE`).
pub const HALO_TYPE: FieldSpec = FieldSpec::plain("EE", 7);
/// Brightness (`H`).
pub const BRIGHTNESS: FieldSpec = FieldSpec::with_unknown("H", 3);
/// Color (`F`).
pub const COLOR: FieldSpec = FieldSpec::with_unknown("F", 3);
/// Completeness (`V`).
pub const COMPLETENESS: FieldSpec = FieldSpec::with_unknown("V", 2);
/// Weather front (`f`).
pub const FRONT: FieldSpec = FieldSpec::with_unknown("f", 4);
/// Precipitation (`zz`).
pub const PRECIPITATION: FieldSpec = FieldSpec::with_unknown("zz", 7);
/// Geographic region (`GG`).
pub const REGION: FieldSpec = FieldSpec::plain("GG", 7);
/// Upper light pillar angle (`HO`).
pub const UPPER_PILLAR: FieldSpec = FieldSpec::with_unknown("HO", 7);
/// Lower light pillar angle (`HU`).
pub const LOWER_PILLAR: FieldSpec = FieldSpec::with_unknown("HU", 7);

/// Scalar fields of the packed region in wire order (escape byte excluded).
///
/// Only used to derive [`PACKED_BITS`]; the encoder and decoder name each
/// field constant directly.
pub const LAYOUT: [FieldSpec; 23] = [
    VERSION,
    OBSERVER,
    OBJECT,
    YEAR,
    MONTH,
    DAY,
    SITE,
    HOUR,
    MINUTE,
    ORIGIN,
    DURATION,
    CLOUD_COVER,
    CIRRUS,
    LOW_CLOUDS,
    HALO_TYPE,
    BRIGHTNESS,
    COLOR,
    COMPLETENESS,
    FRONT,
    PRECIPITATION,
    REGION,
    UPPER_PILLAR,
    LOWER_PILLAR,
];

/// Number of sector characters on the wire.
pub const SECTOR_LEN: usize = 15;
/// Width of one sector character code.
pub const SECTOR_CODE_BITS: u8 = 4;

/// Sector code for a blank position.
pub const SECTOR_SPACE: u32 = 0;
/// Sector code for '/'.
pub const SECTOR_SLASH: u32 = 9;
/// Sector code for '-'.
pub const SECTOR_DASH: u32 = 10;

/// Map a sector character to its 4-bit code.
///
/// The digits share codes with the other symbols: '0' is stored as a blank
/// and '9' as '/'. Characters outside the alphabet become blanks.
pub fn sector_code(c: char) -> u32 {
    match c {
        '/' => SECTOR_SLASH,
        '-' => SECTOR_DASH,
        '0'..='9' => c as u32 - '0' as u32,
        _ => SECTOR_SPACE,
    }
}

/// Map a 4-bit sector code back to its character.
pub fn sector_char(code: u32) -> char {
    match code {
        SECTOR_SLASH => '/',
        SECTOR_DASH => '-',
        1..=8 => char::from(b'0' + code as u8),
        _ => ' ',
    }
}

const fn layout_bits(layout: &[FieldSpec]) -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < layout.len() {
        total += layout[i].width as usize;
        i += 1;
    }
    total
}

/// Bits in the packed region of a record without the observer escape.
pub const PACKED_BITS: usize = layout_bits(&LAYOUT) + SECTOR_LEN * SECTOR_CODE_BITS as usize;

/// Bytes in the packed region of a standard record (175 bits, padded).
pub const FIXED_REGION_LEN: usize = PACKED_BITS.div_ceil(8);

/// Bytes in the packed region when the observer escape byte is present.
pub const ESCAPED_REGION_LEN: usize = (PACKED_BITS + OBSERVER_ESCAPE.width as usize).div_ceil(8);
