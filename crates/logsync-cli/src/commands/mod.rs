//! Subcommands and the arguments they share.

use clap::{Args, ValueEnum};
use logsync_core::errors::{ExError, ExErrorKind};
use std::io::Write;
use std::path::PathBuf;

pub mod history;
pub mod sessions;

/// Report format written to stdout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Sources, fetch limits and report knobs common to every subcommand
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// First source: a local directory (`/path`, `./path`, `local:path`)
    /// or a host (`user@host`, `ssh:host`)
    pub source_a: String,

    /// Second source, same forms as the first
    pub source_b: String,

    /// Only compare paths matching this glob (repeatable)
    #[arg(long, value_name = "GLOB")]
    pub include: Vec<String>,

    /// Skip paths matching this glob (repeatable)
    #[arg(long, value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Maximum detail blocks in the text report
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// Leading ids shown per side for each diverged session
    #[arg(long, value_name = "N")]
    pub preview: Option<usize>,

    /// Per-source fetch timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Extra fetch attempts after a failure
    #[arg(long, value_name = "N")]
    pub retries: Option<u32>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// TOML config file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Display name for the first source
    #[arg(long, value_name = "NAME")]
    pub label_a: Option<String>,

    /// Display name for the second source
    #[arg(long, value_name = "NAME")]
    pub label_b: Option<String>,
}

/// Result of a completed comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    InSync,
    Diverged,
}

/// Write the rendered report to stdout.
pub(crate) fn write_report(report: &str) -> Result<(), ExError> {
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(report.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(|e| {
            ExError::new(ExErrorKind::Internal)
                .with_op("write_report")
                .with_message(e.to_string())
        })
}
