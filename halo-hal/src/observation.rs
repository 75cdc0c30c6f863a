//! In-memory observation record.
//!
//! [`Observation`] is the shared contract between the binary codec in this
//! crate and the other producers of records (CSV import, data entry). Its
//! two string fields are newtypes that enforce their on-disk limits when they
//! are constructed, not when a record is encoded.

use crate::fields::SECTOR_LEN;
use std::fmt;

/// Current record format version (v2.5).
pub const FORMAT_VERSION: u8 = 25;

/// Maximum remark length in bytes.
pub const MAX_REMARK_LEN: usize = 60;

/// Replacement byte for characters that have no Latin-1 encoding.
const LATIN1_REPLACEMENT: u8 = b'?';

/// Sector string of a circular halo.
///
/// Holds at most [`SECTOR_LEN`] characters with trailing whitespace removed;
/// the wire format pads it back to full length with blanks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "String", from = "String"))]
pub struct Sectors(String);

impl Sectors {
    /// Build a sector string, keeping the first 15 characters.
    pub fn new(text: &str) -> Self {
        let clipped: String = text.chars().take(SECTOR_LEN).collect();
        Self(clipped.trim_end().to_string())
    }

    /// The trimmed sector text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether no sector was recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The characters as they appear on the wire, blank padded.
    pub fn padded(&self) -> impl Iterator<Item = char> + '_ {
        self.0.chars().chain(std::iter::repeat(' ')).take(SECTOR_LEN)
    }
}

impl From<&str> for Sectors {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Sectors {
    fn from(text: String) -> Self {
        Self::new(&text)
    }
}

impl From<Sectors> for String {
    fn from(sectors: Sectors) -> Self {
        sectors.0
    }
}

impl fmt::Display for Sectors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Free-text remark, stored as raw single-byte (Latin-1) text.
///
/// The bytes are kept exactly as read so that archives written with other
/// single-byte code pages survive a decode/encode cycle unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "String", from = "String"))]
pub struct Remark(Vec<u8>);

impl Remark {
    /// Build a remark from raw bytes, keeping the first 60.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        let mut bytes = bytes.into();
        bytes.truncate(MAX_REMARK_LEN);
        Self(bytes)
    }

    /// Build a remark from text, one byte per character.
    ///
    /// Characters above U+00FF become `?`.
    pub fn from_latin1(text: &str) -> Self {
        let bytes: Vec<u8> = text
            .chars()
            .take(MAX_REMARK_LEN)
            .map(|c| u8::try_from(c).unwrap_or(LATIN1_REPLACEMENT))
            .collect();
        Self(bytes)
    }

    /// Raw remark bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the remark is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decode the bytes as Latin-1 text.
    pub fn to_latin1_string(&self) -> String {
        self.0.iter().map(|&b| char::from(b)).collect()
    }
}

impl From<&str> for Remark {
    fn from(text: &str) -> Self {
        Self::from_latin1(text)
    }
}

impl From<String> for Remark {
    fn from(text: String) -> Self {
        Self::from_latin1(&text)
    }
}

impl From<Remark> for String {
    fn from(remark: Remark) -> Self {
        remark.to_latin1_string()
    }
}

impl fmt::Display for Remark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_latin1_string())
    }
}

/// One halo observation.
///
/// Fields that may be unknown use `-1`. The duration origin uses 255 for the
/// "not determined" case.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Observation {
    /// Record format version (`vers`).
    pub version: u8,
    /// Observer ID (`KK`, 1-160).
    pub observer: u8,
    /// Object type (`O`, 1-5).
    pub object: u8,
    /// Two-digit year (`JJ`).
    pub year: u8,
    /// Month (`MM`, 1-12).
    pub month: u8,
    /// Day (`TT`, 1-31).
    pub day: u8,
    /// Observing site (`g`): 0 main, 1 other, 2 secondary.
    pub site: u8,
    /// Hour (`ZS`, 0-23).
    pub hour: u8,
    /// Minute (`ZM`, 0-59).
    pub minute: u8,
    /// Duration origin (`d`, 0-7 or 255).
    pub origin: u8,
    /// Duration in units of 10 minutes (`DD`).
    pub duration: u8,
    /// Cloud cover (`N`, 0-10).
    pub cloud_cover: u8,
    /// Cirrus type (`C`).
    pub cirrus: u8,
    /// Low clouds (`c`).
    pub low_clouds: u8,
    /// Halo type (`EE`, 1-99).
    pub halo_type: u8,
    /// Brightness (`H`, -1..3).
    pub brightness: i8,
    /// Color (`F`, -1..6).
    pub color: i8,
    /// Completeness (`V`, -1..2).
    pub completeness: i8,
    /// Weather front (`f`, -1..14).
    pub front: i8,
    /// Precipitation (`zz`, -1..126).
    pub precipitation: i8,
    /// Geographic region (`GG`, 1-39).
    pub region: u8,
    /// Upper light pillar angle (`HO`, -1..126).
    pub upper_pillar: i8,
    /// Lower light pillar angle (`HU`, -1..126).
    pub lower_pillar: i8,
    /// Sector string.
    pub sectors: Sectors,
    /// Remark.
    pub remarks: Remark,
}

impl Default for Observation {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            observer: 0,
            object: 0,
            year: 0,
            month: 0,
            day: 0,
            site: 0,
            hour: 0,
            minute: 0,
            origin: 0,
            duration: 0,
            cloud_cover: 0,
            cirrus: 0,
            low_clouds: 0,
            halo_type: 0,
            brightness: 0,
            color: 0,
            completeness: 0,
            front: 0,
            precipitation: 0,
            region: 0,
            upper_pillar: 0,
            lower_pillar: 0,
            sectors: Sectors::default(),
            remarks: Remark::default(),
        }
    }
}

impl Observation {
    /// Create an empty observation with the current format version.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sector string.
    pub fn with_sectors(mut self, sectors: &str) -> Self {
        self.sectors = Sectors::new(sectors);
        self
    }

    /// Set the remark from text.
    pub fn with_remarks(mut self, remarks: &str) -> Self {
        self.remarks = Remark::from_latin1(remarks);
        self
    }

    /// Whether the observer ID needs the escaped layout.
    pub fn needs_observer_escape(&self) -> bool {
        self.observer > 99
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_version() {
        let obs = Observation::new();
        assert_eq!(obs.version, FORMAT_VERSION);
        assert!(obs.sectors.is_empty());
        assert!(obs.remarks.is_empty());
    }

    #[test]
    fn test_remark_truncated_at_construction() {
        let long = "x".repeat(75);
        let obs = Observation::new().with_remarks(&long);
        assert_eq!(obs.remarks.len(), MAX_REMARK_LEN);

        let raw = Remark::new(vec![0xE4; 61]);
        assert_eq!(raw.len(), MAX_REMARK_LEN);
    }

    #[test]
    fn test_remark_latin1() {
        let remark = Remark::from_latin1("Sonnenhof, Grüße");
        assert_eq!(remark.len(), 16);
        assert_eq!(remark.as_bytes()[13], 0xFC);
        assert_eq!(remark.to_latin1_string(), "Sonnenhof, Grüße");

        let remark = Remark::from_latin1("22° – Ring");
        assert_eq!(remark.to_latin1_string(), "22° ? Ring");
    }

    #[test]
    fn test_sectors_normalized() {
        let sectors = Sectors::new("1-3 5/      ");
        assert_eq!(sectors.as_str(), "1-3 5/");

        let sectors = Sectors::new("1234567812345678");
        assert_eq!(sectors.as_str().len(), SECTOR_LEN);

        let padded: String = Sectors::new("2-4").padded().collect();
        assert_eq!(padded, "2-4            ");
        assert_eq!(padded.len(), SECTOR_LEN);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_json_strings() {
        let obs = Observation {
            observer: 12,
            brightness: -1,
            ..Observation::default()
        }
        .with_sectors("1-3")
        .with_remarks("Ring über Stadt");

        let json = serde_json::to_string(&obs).unwrap();
        assert!(json.contains(r#""sectors":"1-3""#));
        assert!(json.contains(r#""remarks":"Ring über Stadt""#));

        let back: Observation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, obs);
    }

    #[test]
    fn test_observer_escape_threshold() {
        let mut obs = Observation::new();
        obs.observer = 99;
        assert!(!obs.needs_observer_escape());
        obs.observer = 100;
        assert!(obs.needs_observer_escape());
    }
}
