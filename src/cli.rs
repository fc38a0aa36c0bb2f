// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::{ConfigOverrides, DEFAULT_CONFIG_FILE};
use crate::types::LaunchMode;

/// Command-line arguments for `gridrun`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "gridrun",
    version,
    about = "Expand a parameter grid into commands and run them with bounded parallelism.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the sweep file (TOML).
    ///
    /// Default: `Gridrun.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_FILE)]
    pub config: String,

    /// Maximum number of processes running at once (overrides `[sweep].concurrency`).
    #[arg(long, short = 'j', value_name = "K")]
    pub concurrency: Option<usize>,

    /// Directory for output files (overrides `[sweep].output_dir`).
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// How commands are launched (overrides `[sweep].launch_mode`).
    #[arg(long, value_name = "MODE")]
    pub launch_mode: Option<LaunchMode>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `GRIDRUN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print every job, but don't launch anything.
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    /// Settings from the command line that override the sweep file.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            concurrency: self.concurrency,
            output_dir: self.output_dir.clone(),
            launch_mode: self.launch_mode,
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
