//! Sessions command
//!
//! Usage: logsync sessions <SOURCE_A> <SOURCE_B> [OPTIONS]

use crate::commands::{write_report, CommonArgs, OutputFormat, Outcome};
use crate::config::{Config, Settings};
use clap::Args;
use logsync_core::errors::ExError;
use logsync_core::model::SourceId;
use logsync_core::report::{render_json, render_report};
use logsync_core::verify::{verify_texts, FetchedSource};
use logsync_core::{log_op_end, log_op_start};
use logsync_core_types::RunContext;
use logsync_fetch::{fetch_pair, FetchMode, SourceFetcher};
use std::time::Instant;

#[derive(Debug, Args)]
pub struct SessionsArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

fn fetched<'a>(source: &'a SourceId, text: &'a str, label: Option<&str>) -> FetchedSource<'a> {
    let fetched = FetchedSource::new(source, text);
    match label {
        Some(label) => fetched.with_label(label),
        None => fetched,
    }
}

/// Execute sessions command
pub async fn execute(args: SessionsArgs, run: &RunContext) -> Result<Outcome, ExError> {
    let start = Instant::now();
    log_op_start!("verify_sessions");

    let config = Config::load(args.common.config.as_deref())?;
    let settings = Settings::resolve(config, &args.common)?;

    let source_a = SourceId::new(&args.common.source_a);
    let source_b = SourceId::new(&args.common.source_b);
    let fetcher = SourceFetcher::new(FetchMode::Sessions, settings.command.clone());
    let pair = fetch_pair(&fetcher, &source_a, &source_b, &settings.fetch)
        .await
        .map_err(|e| e.with_run_id(run.run_id.clone()))?;

    let verification = verify_texts(
        &fetched(&source_a, &pair.a, args.common.label_a.as_deref()),
        &fetched(&source_b, &pair.b, args.common.label_b.as_deref()),
        &settings.filter,
    );

    let report = match args.common.format {
        OutputFormat::Text => render_report(&verification, &settings.report),
        OutputFormat::Json => render_json(&verification)?,
    };
    write_report(&report)?;

    log_op_end!(
        "verify_sessions",
        start,
        diverged_count = verification.result.counts.diverged,
    );

    Ok(if verification.is_consistent() {
        Outcome::InSync
    } else {
        Outcome::Diverged
    })
}
