//! Command-line tool that generates, encodes, and inspects chunk sections.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p strata-tool -- generate --distinct 40` to write a section,
//! then `cargo run -p strata-tool -- inspect section.bin` to decode it.

mod error;
mod generate;
mod inspect;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use strata_config::{CliArgs, Config};
use tracing::{error, info, warn};

use crate::error::ToolError;
use crate::generate::{GenerateOptions, generate_to_file};
use crate::inspect::inspect_file;

/// CLI arguments for the section tool.
#[derive(Parser, Debug)]
#[command(name = "strata-tool", about = "Generate and inspect encoded chunk sections")]
struct ToolArgs {
    #[command(flatten)]
    common: CliArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scatter random block states over a section and write its encoding.
    Generate {
        /// Number of distinct block states.
        #[arg(long)]
        distinct: Option<u32>,

        /// RNG seed.
        #[arg(long)]
        seed: Option<u64>,

        /// Output file.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Decode an encoded section and report its layout.
    Inspect {
        /// Section file to read.
        path: PathBuf,
    },
}

fn main() -> ExitCode {
    let args = ToolArgs::parse();

    let config_dir = args.common.config_dir();
    let (mut config, load_error) = match Config::load_or_create(&config_dir) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    config.apply_cli_overrides(&args.common);

    // Initialize structured logging.
    strata_log::init_logging(
        Some(&config_dir.join("logs")),
        cfg!(debug_assertions),
        Some(&config),
    );
    if let Some(e) = load_error {
        warn!("Using default config: {e}");
    }

    match run(args.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, config: &Config) -> Result<(), ToolError> {
    match command {
        Command::Generate {
            distinct,
            seed,
            output,
        } => {
            let options = GenerateOptions {
                distinct: distinct.unwrap_or(config.tool.distinct_values),
                seed: seed.unwrap_or(config.tool.seed),
                palette_size_hint: config.storage.palette_size_hint,
                compact: config.storage.compact_before_encode,
            };
            let output = output.unwrap_or_else(|| config.tool.output.clone());
            info!(
                "Generating section: {} distinct values, seed {}",
                options.distinct, options.seed
            );
            generate_to_file(&options, &output)?;
        }
        Command::Inspect { path } => {
            let report = inspect_file(&path)?;
            report.log();
        }
    }
    Ok(())
}
