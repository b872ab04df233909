//! The fetcher seam.

use crate::error::FetchError;
use async_trait::async_trait;
use logsync_core::model::SourceId;

/// What a fetch should return for a source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Manifest text, one `path|count|ids` line per log file
    Sessions,
    /// Raw history file contents (JSON lines)
    History,
}

/// Obtains raw text for one source
///
/// Implementations must either return the complete text or an error; an
/// empty string means the source genuinely has nothing, never that the
/// fetch failed.
#[async_trait]
pub trait ManifestFetcher: Send + Sync {
    async fn fetch(&self, source: &SourceId) -> Result<String, FetchError>;
}

#[async_trait]
impl<T: ManifestFetcher + ?Sized> ManifestFetcher for std::sync::Arc<T> {
    async fn fetch(&self, source: &SourceId) -> Result<String, FetchError> {
        (**self).fetch(source).await
    }
}
