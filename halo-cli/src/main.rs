//! HALO CLI - tools for `.HAL` observation archives
//!
//! Lists, summarizes, verifies and rewrites bit-packed HALO observation files.

mod commands;
mod utils;

use clap::{Parser, Subcommand, ValueEnum};
use env_logger::{Builder, Target};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "halo")]
#[command(author, version, about = "Inspect and verify HALO observation archives")]
#[command(long_about = "
Reads the bit-packed .HAL observation archives of the HALO database.

Examples:
  halo list HALO2024.HAL
  halo list HALO2024.HAL --json
  halo info HALO2024.HAL
  halo dump HALO2024.HAL
  halo test data/*.HAL
  halo repack HALO2024.HAL HALO2024-clean.HAL
")]
struct Cli {
    /// Log verbosity (overridden by RUST_LOG)
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the observations of an archive
    #[command(alias = "l")]
    List {
        /// Archive file to list
        archive: PathBuf,

        /// Show byte offset and record size
        #[arg(short, long)]
        verbose: bool,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,
    },

    /// Show summary information about an archive
    #[command(alias = "i")]
    Info {
        /// Archive file to inspect
        archive: PathBuf,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,
    },

    /// Show the raw bytes of every record
    #[command(alias = "d")]
    Dump {
        /// Archive file to dump
        archive: PathBuf,
    },

    /// Decode every record of one or more archives
    #[command(alias = "t")]
    Test {
        /// Archive files to test
        #[arg(required = true)]
        archives: Vec<PathBuf>,

        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,

        /// Show progress bar
        #[arg(short = 'P', long)]
        progress: bool,
    },

    /// Decode an archive and write it back in normalized form
    Repack {
        /// Input archive file
        input: PathBuf,

        /// Output archive file
        output: PathBuf,

        /// Overwrite the output file if it exists
        #[arg(short, long)]
        force: bool,
    },
}

/// Log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    /// No log output
    Off,
    /// Errors only
    Error,
    /// Warnings (default)
    Warn,
    /// Progress information
    Info,
    /// Per-record details
    Debug,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => Self::Off,
            LogLevel::Error => Self::Error,
            LogLevel::Warn => Self::Warn,
            LogLevel::Info => Self::Info,
            LogLevel::Debug => Self::Debug,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    Builder::new()
        .filter_level(cli.log_level.into())
        .parse_default_env()
        .target(Target::Stderr)
        .format_timestamp_secs()
        .format_module_path(false)
        .init();

    let result = match cli.command {
        Commands::List {
            archive,
            verbose,
            json,
        } => commands::cmd_list(&archive, verbose, json),
        Commands::Info { archive, json } => commands::cmd_info(&archive, json),
        Commands::Dump { archive } => commands::cmd_dump(&archive),
        Commands::Test {
            archives,
            verbose,
            progress,
        } => commands::cmd_test(&archives, verbose, progress),
        Commands::Repack {
            input,
            output,
            force,
        } => commands::cmd_repack(&input, &output, force),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
