//! List command implementation.

use crate::utils::{format_observation, observation_header};
use halo_hal::{Observation, RecordEncoder, RecordStream};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub fn cmd_list(
    archive: &Path,
    verbose: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::open(archive)?;
    let mut stream = RecordStream::new(BufReader::new(file));

    if json {
        let observations: Vec<Observation> = stream.collect::<Result<_, _>>()?;
        println!("{}", serde_json::to_string_pretty(&observations)?);
        return Ok(());
    }

    println!("Archive: {}", archive.display());
    println!();

    let encoder = RecordEncoder::new();
    if verbose {
        println!("{:>8} {:>4}  {}", "Offset", "Size", observation_header());
    } else {
        println!("{}", observation_header());
    }
    println!("{}", "-".repeat(100));

    loop {
        let offset = stream.offset();
        let Some(obs) = stream.next() else { break };
        let obs = obs?;
        if verbose {
            println!(
                "{:>8} {:>4}  {}",
                offset,
                encoder.encoded_len(&obs),
                format_observation(&obs)
            );
        } else {
            println!("{}", format_observation(&obs));
        }
    }

    println!("{}", "-".repeat(100));
    println!("{} observations", stream.records_read());
    if stream.trailing_bytes() > 0 {
        println!("{} trailing bytes ignored", stream.trailing_bytes());
    }

    Ok(())
}
