//! History command
//!
//! Usage: logsync history <SOURCE_A> <SOURCE_B> [OPTIONS]
//!
//! Compares prompt-history files by `(sessionId, timestamp)`.

use crate::commands::{write_report, CommonArgs, OutputFormat, Outcome};
use crate::config::{Config, Settings};
use clap::Args;
use logsync_core::errors::ExError;
use logsync_core::history::{
    compare_history, parse_history, HistorySourceSummary, HistoryVerification,
};
use logsync_core::model::SourceId;
use logsync_core::report::{render_history_json, render_history_report};
use logsync_core::{log_op_end, log_op_start};
use logsync_core_types::RunContext;
use logsync_fetch::{fetch_pair, FetchMode, SourceFetcher};
use std::time::Instant;

#[derive(Debug, Args)]
pub struct HistoryArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

/// Execute history command
pub async fn execute(args: HistoryArgs, run: &RunContext) -> Result<Outcome, ExError> {
    let start = Instant::now();
    log_op_start!("verify_history");

    let config = Config::load(args.common.config.as_deref())?;
    let settings = Settings::resolve(config, &args.common)?;

    let source_a = SourceId::new(&args.common.source_a);
    let source_b = SourceId::new(&args.common.source_b);
    let fetcher = SourceFetcher::new(FetchMode::History, settings.command.clone());
    let pair = fetch_pair(&fetcher, &source_a, &source_b, &settings.fetch)
        .await
        .map_err(|e| e.with_run_id(run.run_id.clone()))?;

    let parsed_a = parse_history(&pair.a);
    let parsed_b = parse_history(&pair.b);
    let label_a = args.common.label_a.clone().unwrap_or_else(|| source_a.label());
    let label_b = args.common.label_b.clone().unwrap_or_else(|| source_b.label());
    let verification = HistoryVerification {
        comparison: compare_history(&parsed_a, &parsed_b),
        a: HistorySourceSummary::new(source_a.as_str(), label_a, &parsed_a),
        b: HistorySourceSummary::new(source_b.as_str(), label_b, &parsed_b),
    };

    let report = match args.common.format {
        OutputFormat::Text => render_history_report(&verification, &settings.report),
        OutputFormat::Json => render_history_json(&verification)?,
    };
    write_report(&report)?;

    log_op_end!(
        "verify_history",
        start,
        a_only = verification.comparison.a_only.len(),
        b_only = verification.comparison.b_only.len(),
    );

    Ok(if verification.comparison.is_consistent() {
        Outcome::InSync
    } else {
        Outcome::Diverged
    })
}
