//! Record encoder.
//!
//! Packs an [`Observation`] into the `.HAL` record layout:
//!
//! ```text
//! [8 vers][7 KK|0][3 O]([8 KK] if escaped)
//! [7 JJ][4 MM][5 TT][2 g][5 ZS][6 ZM][3 d][7 DD][4 N][3 C][4 c]
//! [7 EE][3 H][3 F][2 V][4 f][7 zz][7 GG][7 HO][7 HU]
//! [15 x 4 sectors] -- pad to byte --
//! [8 remark length][remark bytes]
//! ```

use crate::fields::{self, FieldSpec, SECTOR_CODE_BITS, sector_code};
use crate::observation::Observation;
use halo_core::BitWriter;

/// Encoder for single observation records.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordEncoder;

impl RecordEncoder {
    /// Create a new encoder.
    pub fn new() -> Self {
        Self
    }

    /// Number of bytes [`encode`](Self::encode) produces for `obs`.
    pub fn encoded_len(&self, obs: &Observation) -> usize {
        let region = if obs.needs_observer_escape() {
            fields::ESCAPED_REGION_LEN
        } else {
            fields::FIXED_REGION_LEN
        };
        region + 1 + obs.remarks.len()
    }

    /// Encode one observation into a new buffer.
    pub fn encode(&self, obs: &Observation) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len(obs));
        self.encode_into(obs, &mut out);
        out
    }

    /// Encode one observation, appending the record to `out`.
    pub fn encode_into(&self, obs: &Observation, out: &mut Vec<u8>) {
        let mut writer = BitWriter::with_capacity(fields::ESCAPED_REGION_LEN);

        put(&mut writer, &fields::VERSION, obs.version.into());

        if obs.needs_observer_escape() {
            put(&mut writer, &fields::OBSERVER, 0);
            put(&mut writer, &fields::OBJECT, obs.object.into());
            put(&mut writer, &fields::OBSERVER_ESCAPE, obs.observer.into());
        } else {
            put(&mut writer, &fields::OBSERVER, obs.observer.into());
            put(&mut writer, &fields::OBJECT, obs.object.into());
        }

        put(&mut writer, &fields::YEAR, obs.year.into());
        put(&mut writer, &fields::MONTH, obs.month.into());
        put(&mut writer, &fields::DAY, obs.day.into());
        put(&mut writer, &fields::SITE, obs.site.into());
        put(&mut writer, &fields::HOUR, obs.hour.into());
        put(&mut writer, &fields::MINUTE, obs.minute.into());

        put(&mut writer, &fields::ORIGIN, obs.origin.into());
        put(&mut writer, &fields::DURATION, obs.duration.into());
        put(&mut writer, &fields::CLOUD_COVER, obs.cloud_cover.into());
        put(&mut writer, &fields::CIRRUS, obs.cirrus.into());
        put(&mut writer, &fields::LOW_CLOUDS, obs.low_clouds.into());

        put(&mut writer, &fields::HALO_TYPE, obs.halo_type.into());
        put(&mut writer, &fields::BRIGHTNESS, obs.brightness.into());
        put(&mut writer, &fields::COLOR, obs.color.into());
        put(&mut writer, &fields::COMPLETENESS, obs.completeness.into());
        put(&mut writer, &fields::FRONT, obs.front.into());
        put(&mut writer, &fields::PRECIPITATION, obs.precipitation.into());
        put(&mut writer, &fields::REGION, obs.region.into());
        put(&mut writer, &fields::UPPER_PILLAR, obs.upper_pillar.into());
        put(&mut writer, &fields::LOWER_PILLAR, obs.lower_pillar.into());

        for c in obs.sectors.padded() {
            writer.write_bits(sector_code(c), SECTOR_CODE_BITS);
        }

        out.extend_from_slice(&writer.flush());

        // Remark: length byte plus raw bytes, outside the packed region.
        let remark = obs.remarks.as_bytes();
        out.push(remark.len() as u8);
        out.extend_from_slice(remark);
    }
}

#[inline]
fn put(writer: &mut BitWriter, spec: &FieldSpec, value: i16) {
    writer.write_bits(spec.code(value), spec.width);
}

/// Encode one observation (convenience function).
pub fn encode(obs: &Observation) -> Vec<u8> {
    RecordEncoder::new().encode(obs)
}
