//! Fetching from directories on this machine.

use crate::error::FetchError;
use crate::fetcher::{FetchMode, ManifestFetcher};
use crate::source::SourceSpec;
use async_trait::async_trait;
use logsync_core::decoder::{JsonFieldDecoder, RecordDecoder};
use logsync_core::model::{Manifest, ManifestEntry, SourceId};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

/// Default history file name looked up inside a local source directory
pub const DEFAULT_HISTORY_FILE: &str = "history.jsonl";

/// Builds manifests (or reads history) from a local directory
///
/// Session mode walks the directory for `*.jsonl` files and emits one
/// manifest line per file. Files that cannot be read are skipped with a
/// warning; a missing or unreadable root is an error.
#[derive(Clone)]
pub struct LocalDirFetcher {
    mode: FetchMode,
    decoder: Arc<dyn RecordDecoder>,
    history_file: String,
}

impl std::fmt::Debug for LocalDirFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalDirFetcher")
            .field("mode", &self.mode)
            .field("history_file", &self.history_file)
            .finish_non_exhaustive()
    }
}

impl LocalDirFetcher {
    /// Session-manifest fetcher decoding the `uuid` field of each line
    pub fn sessions() -> Self {
        Self::with_decoder(Arc::new(JsonFieldDecoder::default()))
    }

    pub fn with_decoder(decoder: Arc<dyn RecordDecoder>) -> Self {
        Self {
            mode: FetchMode::Sessions,
            decoder,
            history_file: DEFAULT_HISTORY_FILE.to_string(),
        }
    }

    /// History fetcher; a directory source resolves to `<dir>/<history_file>`
    pub fn history(history_file: impl Into<String>) -> Self {
        Self {
            mode: FetchMode::History,
            decoder: Arc::new(JsonFieldDecoder::default()),
            history_file: history_file.into(),
        }
    }

    /// Fetch from a path directly, bypassing handle interpretation.
    ///
    /// # Errors
    ///
    /// `Io` when the root (or history file) cannot be read.
    pub fn fetch_path(&self, root: &Path) -> Result<String, FetchError> {
        match self.mode {
            FetchMode::Sessions => build_manifest(root, self.decoder.as_ref()),
            FetchMode::History if root.is_dir() => read_text(&root.join(&self.history_file)),
            FetchMode::History => read_text(root),
        }
    }
}

#[async_trait]
impl ManifestFetcher for LocalDirFetcher {
    async fn fetch(&self, source: &SourceId) -> Result<String, FetchError> {
        let root: PathBuf = match SourceSpec::parse(source)? {
            SourceSpec::Local(path) => path,
            SourceSpec::Remote(host) => {
                return Err(FetchError::InvalidSource {
                    source_id: source.as_str().to_string(),
                    reason: format!("`{}` is not a local path", host),
                })
            }
        };

        let this = self.clone();
        tokio::task::spawn_blocking(move || this.fetch_path(&root))
            .await
            .map_err(|e| FetchError::failed(source.as_str(), format!("local fetch task: {}", e)))?
    }
}

fn read_text(path: &Path) -> Result<String, FetchError> {
    std::fs::read_to_string(path).map_err(|e| FetchError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Walk `root` and build manifest text for every `*.jsonl` file below it.
///
/// # Errors
///
/// `Io` when `root` is not a readable directory.
pub fn build_manifest(root: &Path, decoder: &dyn RecordDecoder) -> Result<String, FetchError> {
    if !root.is_dir() {
        return Err(FetchError::Io {
            path: root.display().to_string(),
            message: "not a directory".to_string(),
        });
    }

    let mut manifest = Manifest::new();
    for entry in WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        let is_log = path.extension().and_then(|s| s.to_str()) == Some("jsonl");
        if !entry.file_type().is_file() || !is_log {
            continue;
        }

        let relative = path
            .strip_prefix(root)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();
        if relative.contains('|') || relative.contains('\n') {
            tracing::warn!(path = %relative, "skipping log file whose name cannot be listed");
            continue;
        }

        match read_text(path) {
            Ok(content) => {
                manifest.insert(decode_file(&relative, &content, decoder));
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "skipping unreadable log file"
                );
            }
        }
    }

    Ok(manifest.to_text())
}

/// Count non-empty lines and decode ids for one log file.
pub fn decode_file(relative: &str, content: &str, decoder: &dyn RecordDecoder) -> ManifestEntry {
    let mut entry_count = 0;
    let mut ids = Vec::new();
    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        entry_count += 1;
        if let Some(id) = decoder.decode(line) {
            ids.push(id);
        }
    }
    ManifestEntry::with_count(relative, entry_count, ids)
}
