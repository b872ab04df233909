//! logsync CLI
//!
//! Verifies that two copies of an append-only log tree are in sync.

use clap::{Parser, Subcommand, ValueEnum};
use logsync_core::logging_facility::{init, Profile};
use logsync_core_types::RunContext;
use std::process::ExitCode;
use tracing::Instrument;

mod commands;
mod config;
mod exit;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

impl From<LogFormat> for Profile {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Pretty => Profile::Development,
            LogFormat::Json => Profile::Production,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "logsync")]
#[command(about = "logsync - verify append-only log replicas", long_about = None)]
struct Cli {
    /// Log output format on stderr (filter with RUST_LOG)
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compare session logs: identical, one ahead, or diverged
    Sessions(commands::sessions::SessionsArgs),
    /// Compare prompt history entries by (sessionId, timestamp)
    History(commands::history::HistoryArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init(cli.log_format.into());

    let run = RunContext::new();
    // Nested fetch, parse and classify events inherit the run id from this span
    let span = tracing::info_span!("run", run_id = %run.run_id);
    let result = match cli.command {
        Commands::Sessions(args) => commands::sessions::execute(args, &run).instrument(span).await,
        Commands::History(args) => commands::history::execute(args, &run).instrument(span).await,
    };

    match result {
        Ok(commands::Outcome::InSync) => ExitCode::from(exit::codes::IN_SYNC),
        Ok(commands::Outcome::Diverged) => ExitCode::from(exit::codes::DIVERGED),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(exit::exit_code(&e))
        }
    }
}
