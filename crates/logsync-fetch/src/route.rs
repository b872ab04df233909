//! Dispatching a handle to the local or remote fetcher.

use crate::command::{CommandConfig, CommandFetcher};
use crate::error::FetchError;
use crate::fetcher::{FetchMode, ManifestFetcher};
use crate::local::{LocalDirFetcher, DEFAULT_HISTORY_FILE};
use crate::source::SourceSpec;
use async_trait::async_trait;
use logsync_core::decoder::JsonFieldDecoder;
use logsync_core::model::SourceId;
use std::path::Path;
use std::sync::Arc;

/// Fetcher that picks local or remote access per handle
#[derive(Debug, Clone)]
pub struct SourceFetcher {
    local: LocalDirFetcher,
    remote: CommandFetcher,
}

impl SourceFetcher {
    /// `config.id_field` and the file name of `config.history_file` apply to
    /// local directory sources as well as remote ones.
    pub fn new(mode: FetchMode, config: CommandConfig) -> Self {
        match mode {
            FetchMode::Sessions => Self {
                local: LocalDirFetcher::with_decoder(Arc::new(JsonFieldDecoder::new(
                    &config.id_field,
                ))),
                remote: CommandFetcher::sessions(config),
            },
            FetchMode::History => Self {
                local: LocalDirFetcher::history(local_history_file(&config.history_file)),
                remote: CommandFetcher::history(config),
            },
        }
    }
}

/// File name of the configured history path, looked up inside local directories
fn local_history_file(configured: &str) -> String {
    Path::new(configured)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(DEFAULT_HISTORY_FILE)
        .to_string()
}

#[async_trait]
impl ManifestFetcher for SourceFetcher {
    async fn fetch(&self, source: &SourceId) -> Result<String, FetchError> {
        match SourceSpec::parse(source)? {
            SourceSpec::Local(_) => self.local.fetch(source).await,
            SourceSpec::Remote(_) => self.remote.fetch(source).await,
        }
    }
}
