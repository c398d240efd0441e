//! Command-line argument parsing shared by the Strata binaries.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Common command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "strata", about = "Strata section storage")]
pub struct CliArgs {
    /// Log level (error, warn, info, debug, trace) or a full filter string.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Palette capacity reserved by new sections.
    #[arg(long, global = true)]
    pub palette_size_hint: Option<usize>,

    /// Keep unused palette entries when encoding.
    #[arg(long, global = true)]
    pub no_compact: bool,

    /// Path to config directory (overrides default location).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

impl CliArgs {
    /// Directory to load `config.ron` from.
    pub fn config_dir(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_dir)
    }
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(hint) = args.palette_size_hint {
            self.storage.palette_size_hint = hint;
        }
        if args.no_compact {
            self.storage.compact_before_encode = false;
        }
    }
}
