//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// mRS Pipeline - simulated clinical note extraction dashboard
#[derive(Parser, Debug)]
#[command(
    name = "mrs-pipeline",
    author,
    version,
    about = "Simulated mRS extraction pipeline dashboard",
    long_about = "A terminal dashboard for the mRS extraction pipeline demo.\n\n\
                  Walks seven pipeline stages (de-identification through mRS \n\
                  scoring) through a scripted timer-driven progression. All \n\
                  displayed results are demo constants - no clinical data is \n\
                  processed."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "MRS_PIPELINE_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "MRS_PIPELINE_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a simulated extraction for a clinical note
    Run(RunArgs),

    /// Validate a configuration file without running
    Validate(ValidateArgs),

    /// Display the static stage catalog
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON); defaults apply if absent
    #[arg(
        short,
        long,
        default_value = "dashboard.toml",
        env = "MRS_PIPELINE_CONFIG"
    )]
    pub config: PathBuf,

    /// Clinical note text passed inline
    #[arg(long, conflicts_with = "note_file")]
    pub note: Option<String>,

    /// Read the clinical note from a file
    #[arg(long)]
    pub note_file: Option<PathBuf>,

    /// Override stage transition interval in milliseconds
    #[arg(long, env = "MRS_PIPELINE_TICK_MS")]
    pub tick_ms: Option<u64>,

    /// Override sampling temperature (0.0 - 1.0, captured but unused)
    #[arg(long)]
    pub temperature: Option<f64>,

    /// Override nucleus sampling parameter (0.0 - 1.0, captured but unused)
    #[arg(long)]
    pub top_p: Option<f64>,

    /// Drive the progression synchronously without the timer
    #[arg(long)]
    pub no_animate: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "MRS_PIPELINE_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "dashboard.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show the expanded demo detail panel for every stage
    #[arg(long)]
    pub details: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}
