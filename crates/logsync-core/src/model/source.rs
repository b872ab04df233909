use serde::{Deserialize, Serialize};

/// Opaque handle naming one source of manifests
///
/// The core never interprets the handle; fetchers decide what it means
/// (a remote host, a local directory, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceId(String);

impl SourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short display label for reports.
    ///
    /// Uses the final path component for path-like handles and the host part
    /// for `user@host` handles; falls back to the raw handle.
    pub fn label(&self) -> String {
        let raw = self
            .0
            .strip_prefix("local:")
            .or_else(|| self.0.strip_prefix("ssh:"))
            .unwrap_or(&self.0);
        let trimmed = raw.trim_end_matches('/');
        let last = trimmed.rsplit('/').next().unwrap_or(trimmed);
        let host = last.rsplit('@').next().unwrap_or(last);
        if host.is_empty() {
            self.0.clone()
        } else {
            host.to_string()
        }
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SourceId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_for_paths_and_hosts() {
        assert_eq!(SourceId::new("/tmp/arm-claude").label(), "arm-claude");
        assert_eq!(SourceId::new("/tmp/arm-claude/").label(), "arm-claude");
        assert_eq!(SourceId::new("local:./x86").label(), "x86");
        assert_eq!(SourceId::new("ssh:dev@build-box").label(), "build-box");
        assert_eq!(SourceId::new("laptop").label(), "laptop");
    }

    #[test]
    fn test_label_falls_back_to_raw() {
        assert_eq!(SourceId::new("/").label(), "/");
    }
}
