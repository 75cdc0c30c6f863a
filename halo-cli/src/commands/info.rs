//! Info command implementation.

use halo_hal::{Observation, RecordEncoder, RecordStream};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Size of one record in the uncompressed fixed-width text layout.
const NATURAL_RECORD_SIZE: u64 = 100;

/// Summary of one archive.
#[derive(Debug, Default, Serialize)]
pub struct ArchiveInfo {
    pub file: String,
    pub size: u64,
    pub records: usize,
    pub escaped_observer_records: usize,
    pub distinct_observers: usize,
    pub records_with_remarks: usize,
    pub remark_bytes: u64,
    pub trailing_bytes: usize,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
}

impl ArchiveInfo {
    /// Fold a sequence of observations into a summary.
    pub fn summarize<'a>(
        file: String,
        size: u64,
        observations: impl IntoIterator<Item = &'a Observation>,
    ) -> Self {
        let mut info = Self {
            file,
            size,
            ..Self::default()
        };
        let mut observers = BTreeSet::new();
        let mut dates = BTreeSet::new();

        for obs in observations {
            info.records += 1;
            if obs.needs_observer_escape() {
                info.escaped_observer_records += 1;
            }
            if !obs.remarks.is_empty() {
                info.records_with_remarks += 1;
                info.remark_bytes += obs.remarks.len() as u64;
            }
            observers.insert(obs.observer);
            dates.insert((obs.year, obs.month, obs.day));
        }

        let fmt_date = |&(y, m, d): &(u8, u8, u8)| format!("{:02}-{:02}-{:02}", y, m, d);
        info.distinct_observers = observers.len();
        info.first_date = dates.first().map(fmt_date);
        info.last_date = dates.last().map(fmt_date);
        info
    }
}

pub fn cmd_info(archive: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::open(archive)?;
    let metadata = file.metadata()?;
    let mut stream = RecordStream::new(BufReader::new(file));
    let observations: Vec<Observation> = stream.by_ref().collect::<Result<_, _>>()?;

    let mut info = ArchiveInfo::summarize(
        archive.display().to_string(),
        metadata.len(),
        &observations,
    );
    info.trailing_bytes = stream.trailing_bytes();

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("Archive Information");
    println!("===================");
    println!("File: {}", info.file);
    println!("Size: {} bytes", info.size);
    println!();
    println!("Contents:");
    println!("  Observations: {}", info.records);
    println!("  Escaped observer IDs: {}", info.escaped_observer_records);
    println!("  Distinct observers: {}", info.distinct_observers);
    println!(
        "  With remarks: {} ({} bytes)",
        info.records_with_remarks, info.remark_bytes
    );
    if let (Some(first), Some(last)) = (&info.first_date, &info.last_date) {
        println!("  Dates (JJ-MM-TT): {} .. {}", first, last);
    }
    if info.trailing_bytes > 0 {
        println!("  Trailing bytes: {}", info.trailing_bytes);
    }

    if info.records > 0 {
        let encoder = RecordEncoder::new();
        let packed: u64 = observations
            .iter()
            .map(|obs| encoder.encoded_len(obs) as u64)
            .sum();
        let natural = info.records as u64 * NATURAL_RECORD_SIZE;
        println!(
            "  Average record size: {:.1} bytes",
            packed as f64 / info.records as f64
        );
        println!(
            "  Compression ratio: {:.1}%",
            (1.0 - packed as f64 / natural as f64) * 100.0
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_summary() {
        let observations = vec![
            Observation {
                observer: 12,
                year: 24,
                month: 5,
                day: 2,
                ..Observation::default()
            }
            .with_remarks("abc"),
            Observation {
                observer: 130,
                year: 23,
                month: 11,
                day: 30,
                ..Observation::default()
            },
            Observation {
                observer: 12,
                year: 24,
                month: 1,
                day: 9,
                ..Observation::default()
            },
        ];

        let info = ArchiveInfo::summarize("x.HAL".into(), 0, &observations);
        assert_eq!(info.records, 3);
        assert_eq!(info.escaped_observer_records, 1);
        assert_eq!(info.distinct_observers, 2);
        assert_eq!(info.records_with_remarks, 1);
        assert_eq!(info.remark_bytes, 3);
        assert_eq!(info.first_date.as_deref(), Some("23-11-30"));
        assert_eq!(info.last_date.as_deref(), Some("24-05-02"));
    }
}
