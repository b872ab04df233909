//! Path allowlist applied to manifests before classification.

use crate::errors::{ExError, SyncError};
use glob::Pattern;

/// Include/exclude glob filter over manifest paths
///
/// With no include patterns every path is included. Exclude patterns win
/// over include patterns.
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    include_patterns: Vec<Pattern>,
    exclude_patterns: Vec<Pattern>,
}

impl PathFilter {
    /// Build a filter from glob strings.
    ///
    /// # Errors
    ///
    /// `InvalidPattern` when any pattern fails to compile.
    pub fn new(includes: &[String], excludes: &[String]) -> Result<Self, ExError> {
        Ok(Self {
            include_patterns: compile(includes)?,
            exclude_patterns: compile(excludes)?,
        })
    }

    /// Filter that accepts every path
    pub fn all() -> Self {
        Self::default()
    }

    pub fn is_all(&self) -> bool {
        self.include_patterns.is_empty() && self.exclude_patterns.is_empty()
    }

    pub fn matches(&self, path: &str) -> bool {
        let included = self.include_patterns.is_empty()
            || self.include_patterns.iter().any(|p| p.matches(path));
        included && !self.exclude_patterns.iter().any(|p| p.matches(path))
    }
}

fn compile(patterns: &[String]) -> Result<Vec<Pattern>, ExError> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| {
                ExError::from(SyncError::InvalidPattern {
                    pattern: p.clone(),
                    reason: e.msg.to_string(),
                })
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExErrorKind;

    fn strings(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_default_accepts_everything() {
        let filter = PathFilter::all();
        assert!(filter.is_all());
        assert!(filter.matches("any/path.jsonl"));
    }

    #[test]
    fn test_include_and_exclude() {
        let filter = PathFilter::new(&strings(&["proj-a/*"]), &strings(&["*/agent-*"])).unwrap();
        assert!(filter.matches("proj-a/s1.jsonl"));
        assert!(!filter.matches("proj-b/s1.jsonl"));
        assert!(!filter.matches("proj-a/agent-1.jsonl"));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = PathFilter::new(&strings(&["[unclosed"]), &[]).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidPattern);
        assert!(err.message().contains("[unclosed"));
    }
}
