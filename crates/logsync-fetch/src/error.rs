//! Fetch-layer errors.

use logsync_core::errors::{ExError, ExErrorKind};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while obtaining a manifest from one source
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Transport, authentication or remote-command failure
    #[error("fetch from {source_id} failed: {message}")]
    Failed { source_id: String, message: String },

    /// The fetch did not finish within the allotted time
    #[error("fetch from {source_id} timed out after {}s", .timeout.as_secs_f64())]
    Timeout { source_id: String, timeout: Duration },

    /// A local source could not be read
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },

    /// The source handle does not name anything fetchable
    #[error("invalid source `{source_id}`: {reason}")]
    InvalidSource { source_id: String, reason: String },
}

impl FetchError {
    pub fn failed(source_id: impl Into<String>, message: impl Into<String>) -> Self {
        FetchError::Failed {
            source_id: source_id.into(),
            message: message.into(),
        }
    }

    /// Whether another attempt could succeed
    pub fn is_retryable(&self) -> bool {
        !matches!(self, FetchError::InvalidSource { .. })
    }
}

impl From<FetchError> for ExError {
    fn from(err: FetchError) -> Self {
        let message = err.to_string();
        match err {
            FetchError::Failed { source_id, .. } => ExError::new(ExErrorKind::FetchFailed)
                .with_op("fetch")
                .with_source_id(source_id)
                .with_message(message),
            FetchError::Timeout { source_id, .. } => ExError::new(ExErrorKind::FetchTimeout)
                .with_op("fetch")
                .with_source_id(source_id)
                .with_message(message),
            FetchError::Io { path, .. } => ExError::new(ExErrorKind::FetchFailed)
                .with_op("fetch")
                .with_path(path)
                .with_message(message),
            FetchError::InvalidSource { source_id, .. } => {
                ExError::new(ExErrorKind::InvalidSource)
                    .with_op("fetch")
                    .with_source_id(source_id)
                    .with_message(message)
            }
        }
    }
}
