//! Repack command implementation.

use halo_hal::{read_observations, write_observations};
use log::info;
use std::path::Path;

pub fn cmd_repack(
    input: &Path,
    output: &Path,
    force: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if output.exists() && !force {
        return Err(format!(
            "Output file {} exists (use --force to overwrite)",
            output.display()
        )
        .into());
    }

    let input_size = std::fs::metadata(input)?.len();
    let observations = read_observations(input)?;
    info!(
        "read {} observations from {}",
        observations.len(),
        input.display()
    );

    write_observations(output, &observations)?;
    let output_size = std::fs::metadata(output)?.len();

    println!(
        "Repacked {} observations: {} bytes -> {} bytes",
        observations.len(),
        input_size,
        output_size
    );

    Ok(())
}
