//! Utility functions for the CLI.

use halo_hal::Observation;
use indicatif::{ProgressBar, ProgressStyle};

/// Create a progress bar with standard styling.
pub fn create_progress_bar(len: u64, enable: bool) -> ProgressBar {
    if !enable {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("progress bar template is valid")
            .progress_chars("█▓▒░ "),
    );
    pb
}

/// Format a field that uses `-1` for "unknown", the way observers write it.
pub fn format_optional(value: i8, width: usize) -> String {
    if value < 0 {
        "/".repeat(width)
    } else {
        format!("{:0width$}", value, width = width)
    }
}

/// Format the duration origin; 255 means "not determined".
pub fn format_origin(origin: u8) -> String {
    if origin == 255 {
        "/".to_string()
    } else {
        origin.to_string()
    }
}

/// Space separated lowercase hex bytes.
pub fn format_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Latin-1 text with control characters shown as '.'.
pub fn format_latin1(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| {
            let c = char::from(b);
            if c.is_control() { '.' } else { c }
        })
        .collect()
}

/// Header line matching [`format_observation`].
pub fn observation_header() -> &'static str {
    "KK O JJMMTT g ZSZM d DD N C c EE H F V f  zz GG HO HU Sectors         Remarks"
}

/// One observation in the key layout of the paper forms.
pub fn format_observation(obs: &Observation) -> String {
    format!(
        "{:02} {} {:02}{:02}{:02} {} {:02}{:02} {} {:02} {} {} {} {:02} {} {} {} {} {} {:02} {} {} {:<15} {}",
        obs.observer,
        obs.object,
        obs.year,
        obs.month,
        obs.day,
        obs.site,
        obs.hour,
        obs.minute,
        format_origin(obs.origin),
        obs.duration,
        obs.cloud_cover,
        obs.cirrus,
        obs.low_clouds,
        obs.halo_type,
        format_optional(obs.brightness, 1),
        format_optional(obs.color, 1),
        format_optional(obs.completeness, 1),
        format_optional(obs.front, 1),
        format_optional(obs.precipitation, 3),
        obs.region,
        format_optional(obs.upper_pillar, 2),
        format_optional(obs.lower_pillar, 2),
        obs.sectors.as_str(),
        obs.remarks,
    )
}
