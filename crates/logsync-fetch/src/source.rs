//! Interpreting source handles.

use crate::error::FetchError;
use logsync_core::model::SourceId;
use std::path::PathBuf;

/// Where a source handle points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    /// A directory (or history file) on this machine
    Local(PathBuf),
    /// A host reachable through the configured remote program
    Remote(String),
}

impl SourceSpec {
    /// Interpret a handle.
    ///
    /// `local:` forces a local path and `ssh:` a remote host. Without a
    /// prefix, handles starting with `/` or `.` are local paths and anything
    /// else is a host.
    ///
    /// # Errors
    ///
    /// `InvalidSource` for an empty handle or an empty path/host after the prefix.
    pub fn parse(source: &SourceId) -> Result<Self, FetchError> {
        let raw = source.as_str().trim();
        let invalid = |reason: &str| FetchError::InvalidSource {
            source_id: source.as_str().to_string(),
            reason: reason.to_string(),
        };

        let spec = if let Some(path) = raw.strip_prefix("local:") {
            SourceSpec::Local(PathBuf::from(path))
        } else if let Some(host) = raw.strip_prefix("ssh:") {
            SourceSpec::Remote(host.to_string())
        } else if raw.starts_with('/') || raw.starts_with('.') {
            SourceSpec::Local(PathBuf::from(raw))
        } else {
            SourceSpec::Remote(raw.to_string())
        };

        match &spec {
            SourceSpec::Local(p) if p.as_os_str().is_empty() => Err(invalid("empty path")),
            SourceSpec::Remote(h) if h.is_empty() => Err(invalid("empty host")),
            _ => Ok(spec),
        }
    }
}
