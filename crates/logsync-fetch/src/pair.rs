//! Fetching both sources of one run.

use crate::error::FetchError;
use crate::fetcher::ManifestFetcher;
use logsync_core::errors::ExError;
use logsync_core::model::{Side, SourceId};
use logsync_core::{log_op_end, log_op_error, log_op_start};
use std::time::{Duration, Instant};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(1);

/// Per-fetch limits applied to each side independently
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Upper bound for a single attempt
    pub timeout: Duration,
    /// Extra attempts after the first failure
    pub retries: u32,
    /// Delay before retry `n` is `backoff * n`
    pub backoff: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            retries: 0,
            backoff: DEFAULT_BACKOFF,
        }
    }
}

/// Raw text fetched for both sides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPair {
    pub a: String,
    pub b: String,
}

async fn attempt<F>(fetcher: &F, source: &SourceId, timeout: Duration) -> Result<String, FetchError>
where
    F: ManifestFetcher + ?Sized,
{
    match tokio::time::timeout(timeout, fetcher.fetch(source)).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout {
            source_id: source.as_str().to_string(),
            timeout,
        }),
    }
}

/// Fetch one side with timeout and capped retry.
///
/// # Errors
///
/// The last attempt's error, converted to [`ExError`] and attributed to `side`.
pub async fn fetch_side<F>(
    fetcher: &F,
    side: Side,
    source: &SourceId,
    opts: &FetchOptions,
) -> Result<String, ExError>
where
    F: ManifestFetcher + ?Sized,
{
    let start = Instant::now();
    log_op_start!("fetch", side: side, source: source);

    let mut retries_used = 0;
    let result = loop {
        match attempt(fetcher, source, opts.timeout).await {
            Ok(text) => break Ok(text),
            Err(e) if retries_used < opts.retries && e.is_retryable() => {
                retries_used += 1;
                tracing::warn!(
                    side = %side,
                    source_id = %source,
                    attempt = retries_used,
                    error = %e,
                    "fetch failed, retrying"
                );
                tokio::time::sleep(opts.backoff * retries_used).await;
            }
            Err(e) => break Err(e),
        }
    };

    match result {
        Ok(text) => {
            log_op_end!("fetch", start, side: side, source: source, bytes = text.len());
            Ok(text)
        }
        Err(e) => {
            let mut err = ExError::from(e).with_side(side);
            if err.source_id().is_none() {
                err = err.with_source_id(source.as_str());
            }
            log_op_error!("fetch", err, start, side: side, source: source);
            Err(err)
        }
    }
}

/// Fetch both sources concurrently.
///
/// Both fetches run to completion (or timeout) before returning. Any
/// failure fails the pair; when both sides fail, side A's error is returned.
///
/// # Errors
///
/// The failing side's [`ExError`], with [`Side`] attached.
pub async fn fetch_pair<F>(
    fetcher: &F,
    a: &SourceId,
    b: &SourceId,
    opts: &FetchOptions,
) -> Result<FetchedPair, ExError>
where
    F: ManifestFetcher + ?Sized,
{
    let (text_a, text_b) = tokio::join!(
        fetch_side(fetcher, Side::A, a, opts),
        fetch_side(fetcher, Side::B, b, opts)
    );
    Ok(FetchedPair {
        a: text_a?,
        b: text_b?,
    })
}
