//! Record codec integration tests.

use halo_hal::{
    HaloError, MAX_REMARK_LEN, Observation, Remark, decode, encode,
    fields::{ESCAPED_REGION_LEN, FIXED_REGION_LEN},
};

fn base() -> Observation {
    Observation {
        observer: 44,
        object: 1,
        year: 24,
        month: 2,
        day: 29,
        site: 0,
        hour: 14,
        minute: 5,
        origin: 1,
        duration: 6,
        cloud_cover: 4,
        cirrus: 2,
        low_clouds: 3,
        halo_type: 4,
        brightness: 2,
        color: 1,
        completeness: 1,
        front: 8,
        precipitation: 0,
        region: 17,
        upper_pillar: 12,
        lower_pillar: 3,
        ..Observation::default()
    }
    .with_sectors("2-4 6/")
    .with_remarks("Nebensonnen beidseitig")
}

fn roundtrip(obs: &Observation) -> Observation {
    let bytes = encode(obs);
    let (decoded, consumed) = decode(&bytes).expect("decode failed");
    assert_eq!(consumed, bytes.len(), "consumed length mismatch");
    decoded
}

#[test]
fn test_roundtrip_typical_record() {
    let obs = base();
    assert_eq!(roundtrip(&obs), obs);
}

#[test]
fn test_roundtrip_field_extremes() {
    let low = Observation {
        version: 0,
        observer: 1,
        object: 1,
        year: 0,
        month: 1,
        day: 1,
        site: 0,
        hour: 0,
        minute: 0,
        origin: 0,
        duration: 0,
        cloud_cover: 0,
        cirrus: 0,
        low_clouds: 0,
        halo_type: 1,
        brightness: 0,
        color: 0,
        completeness: 0,
        front: 0,
        precipitation: 0,
        region: 1,
        upper_pillar: 0,
        lower_pillar: 0,
        ..Observation::default()
    };
    assert_eq!(roundtrip(&low), low);

    let high = Observation {
        version: 255,
        observer: 99,
        object: 5,
        year: 99,
        month: 12,
        day: 31,
        site: 2,
        hour: 23,
        minute: 59,
        origin: 7,
        duration: 127,
        cloud_cover: 10,
        cirrus: 7,
        low_clouds: 15,
        halo_type: 99,
        brightness: 3,
        color: 6,
        completeness: 2,
        front: 14,
        precipitation: 126,
        region: 39,
        upper_pillar: 126,
        lower_pillar: 126,
        ..Observation::default()
    }
    .with_sectors("12345678/-12345")
    .with_remarks(&"z".repeat(MAX_REMARK_LEN));
    assert_eq!(roundtrip(&high), high);
}

#[test]
fn test_origin_255_roundtrip() {
    let obs = Observation {
        origin: 255,
        ..base()
    };
    assert_eq!(roundtrip(&obs).origin, 255);
}

#[test]
fn test_all_unknown_roundtrip() {
    let obs = Observation {
        origin: 255,
        brightness: -1,
        color: -1,
        completeness: -1,
        front: -1,
        precipitation: -1,
        upper_pillar: -1,
        lower_pillar: -1,
        ..base()
    };
    assert_eq!(roundtrip(&obs), obs);
}

#[test]
fn test_each_unknown_field_independently() {
    type Setter = fn(&mut Observation);
    let cases: [(&str, Setter); 7] = [
        ("H", |o| o.brightness = -1),
        ("F", |o| o.color = -1),
        ("V", |o| o.completeness = -1),
        ("f", |o| o.front = -1),
        ("zz", |o| o.precipitation = -1),
        ("HO", |o| o.upper_pillar = -1),
        ("HU", |o| o.lower_pillar = -1),
    ];

    for (name, set_unknown) in cases {
        let mut obs = base();
        set_unknown(&mut obs);
        let decoded = roundtrip(&obs);
        assert_eq!(decoded, obs, "field {name} did not survive as unknown");
        // Neighbouring fields keep their known values.
        assert_eq!(decoded.region, 17, "field {name} disturbed GG");
    }
}

#[test]
fn test_observer_escape() {
    for observer in [1u8, 99, 100, 160] {
        let obs = Observation {
            observer,
            ..base()
        };
        let decoded = roundtrip(&obs);
        assert_eq!(decoded.observer, observer);
        assert_eq!(decoded, obs);
    }
}

#[test]
fn test_escape_adds_one_byte() {
    let normal = encode(&Observation {
        observer: 99,
        ..base()
    });
    let escaped = encode(&Observation {
        observer: 100,
        ..base()
    });
    assert_eq!(escaped.len(), normal.len() + 1);
    assert_eq!(escaped.len() - normal.len(), ESCAPED_REGION_LEN - FIXED_REGION_LEN);
}

#[test]
fn test_remark_boundaries() {
    for len in [0usize, 1, 59, 60] {
        let text = "r".repeat(len);
        let obs = base().with_remarks(&text);
        let bytes = encode(&obs);
        assert_eq!(bytes.len(), FIXED_REGION_LEN + 1 + len);
        let decoded = roundtrip(&obs);
        assert_eq!(decoded.remarks.to_latin1_string(), text);
    }
}

#[test]
fn test_long_remark_truncated_before_encoding() {
    let text = "q".repeat(61);
    let obs = base().with_remarks(&text);
    assert_eq!(obs.remarks.len(), MAX_REMARK_LEN);

    let bytes = encode(&obs);
    assert_eq!(bytes[FIXED_REGION_LEN] as usize, MAX_REMARK_LEN);
    assert_eq!(roundtrip(&obs).remarks.to_latin1_string(), "q".repeat(60));

    let raw = Remark::new(vec![b'w'; 200]);
    assert_eq!(raw.len(), MAX_REMARK_LEN);
}

#[test]
fn test_latin1_remark_roundtrip() {
    let obs = base().with_remarks("Säule über Straßenlaterne, -5°C");
    let decoded = roundtrip(&obs);
    assert_eq!(
        decoded.remarks.to_latin1_string(),
        "Säule über Straßenlaterne, -5°C"
    );
}

#[test]
fn test_sector_alphabet() {
    let obs = base().with_sectors("a-1 /");
    let decoded = roundtrip(&obs);
    // The unmapped 'a' is stored as a blank; inner blanks survive, the
    // padding does not.
    assert_eq!(decoded.sectors.as_str(), " -1 /");

    let obs = base().with_sectors("1-2/3   ");
    assert_eq!(roundtrip(&obs).sectors.as_str(), "1-2/3");
}

#[test]
fn test_short_buffer_rejected() {
    let bytes = encode(&base());
    for len in 0..FIXED_REGION_LEN {
        match decode(&bytes[..len]) {
            Err(HaloError::TruncatedRecord { available, .. }) => assert_eq!(available, len),
            other => panic!("expected TruncatedRecord for {len} bytes, got {other:?}"),
        }
    }
    // Fewer than 21 bytes in particular.
    assert!(decode(&[0xFF; 20]).unwrap_err().is_end_of_stream());
}

#[test]
fn test_version_byte_is_first() {
    let obs = Observation {
        version: 26,
        ..base()
    };
    let bytes = encode(&obs);
    assert_eq!(bytes[0], 26);
    assert_eq!(roundtrip(&obs).version, 26);
}
