//! Dump command implementation.

use crate::utils::{format_hex, format_latin1};
use halo_hal::{RecordLayout, RecordStream};
use std::fmt::Write as _;
use std::path::Path;

/// Render the raw bytes of one record: packed region, length byte, remark.
pub fn dump_record(index: usize, offset: u64, bytes: &[u8]) -> halo_hal::Result<String> {
    let layout = RecordLayout::detect(bytes)?;
    let region_len = layout.region_len();
    let (region, rest) = bytes.split_at(region_len.min(bytes.len()));
    let (length, remark) = rest.split_first().map_or((None, &[][..]), |(l, r)| (Some(*l), r));

    let mut out = String::new();
    let kind = match layout {
        RecordLayout::Standard => "standard",
        RecordLayout::Escaped => "escaped",
    };
    let _ = writeln!(out, "#{index} @{offset} {kind}, {} bytes", bytes.len());
    let _ = writeln!(out, "  region  {}", format_hex(region));
    if let Some(length) = length {
        let _ = writeln!(out, "  length  {length:02x}");
    }
    if !remark.is_empty() {
        let _ = writeln!(
            out,
            "  remark  {}  |{}|",
            format_hex(remark),
            format_latin1(remark)
        );
    }
    Ok(out)
}

pub fn cmd_dump(archive: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let data = std::fs::read(archive)?;
    let mut stream = RecordStream::from_bytes(&data);

    println!("Archive: {} ({} bytes)", archive.display(), data.len());
    println!();

    loop {
        let start = stream.offset();
        let Some(obs) = stream.next() else { break };
        obs?;
        let end = stream.offset();
        let bytes = &data[start as usize..end as usize];
        print!("{}", dump_record(stream.records_read(), start, bytes)?);
    }

    let trailing = stream.trailing_bytes();
    if trailing > 0 {
        let tail = &data[data.len() - trailing..];
        println!("trailing  {}", format_hex(tail));
    }

    Ok(())
}
