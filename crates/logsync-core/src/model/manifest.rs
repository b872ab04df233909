use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One log file as listed by a source
///
/// `ids` holds one identifier per decoded log line, in append order.
/// `entry_count` is the count the source declared for the file; it is
/// diagnostic only and may legitimately differ from `ids.len()` (lines
/// without an identifier, or a corrupted fetch).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Path relative to the source root; unique key within a manifest
    pub path: String,

    /// Entry count declared by the source
    pub entry_count: usize,

    /// Ordered identifiers, one per log line
    pub ids: Vec<String>,
}

impl ManifestEntry {
    /// Create an entry whose declared count matches its ids
    pub fn new(path: impl Into<String>, ids: Vec<String>) -> Self {
        let entry_count = ids.len();
        Self {
            path: path.into(),
            entry_count,
            ids,
        }
    }

    /// Create an entry with an explicit declared count
    pub fn with_count(path: impl Into<String>, entry_count: usize, ids: Vec<String>) -> Self {
        Self {
            path: path.into(),
            entry_count,
            ids,
        }
    }

    /// True when the declared count disagrees with the id sequence
    pub fn count_mismatch(&self) -> bool {
        self.entry_count != self.ids.len()
    }

    /// Encode as a manifest line: `path|count|id1,id2,...,`
    ///
    /// Every id is followed by a comma, matching what the remote
    /// manifest script emits; the parser drops the trailing separator.
    /// Empty ids at the end of the list do not survive a reparse, which is
    /// why decoders never produce them.
    pub fn to_line(&self) -> String {
        let mut line = format!("{}|{}|", self.path, self.entry_count);
        for id in &self.ids {
            line.push_str(id);
            line.push(',');
        }
        line
    }
}

/// All log files listed by one source, keyed by relative path
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    entries: BTreeMap<String, ManifestEntry>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, replacing any previous entry with the same path.
    ///
    /// Returns the replaced entry, if any.
    pub fn insert(&mut self, entry: ManifestEntry) -> Option<ManifestEntry> {
        self.entries.insert(entry.path.clone(), entry)
    }

    pub fn get(&self, path: &str) -> Option<&ManifestEntry> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Paths in lexicographic order
    pub fn paths(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    /// Entries in lexicographic path order
    pub fn entries(&self) -> impl Iterator<Item = &ManifestEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keep only entries whose path satisfies the predicate
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str) -> bool,
    {
        self.entries.retain(|path, _| keep(path));
    }

    /// Render the manifest back into raw manifest text
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for entry in self.entries.values() {
            out.push_str(&entry.to_line());
            out.push('\n');
        }
        out
    }
}

impl FromIterator<ManifestEntry> for Manifest {
    fn from_iter<I: IntoIterator<Item = ManifestEntry>>(iter: I) -> Self {
        let mut manifest = Manifest::new();
        for entry in iter {
            manifest.insert(entry);
        }
        manifest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_to_line_has_trailing_separator() {
        let entry = ManifestEntry::new("proj/s1.jsonl", ids(&["u1", "u2"]));
        assert_eq!(entry.to_line(), "proj/s1.jsonl|2|u1,u2,");
    }

    #[test]
    fn test_to_line_empty_ids() {
        let entry = ManifestEntry::with_count("proj/empty.jsonl", 0, Vec::new());
        assert_eq!(entry.to_line(), "proj/empty.jsonl|0|");
    }

    #[test]
    fn test_count_mismatch() {
        assert!(!ManifestEntry::new("p", ids(&["a"])).count_mismatch());
        assert!(ManifestEntry::with_count("p", 3, ids(&["a"])).count_mismatch());
    }

    #[test]
    fn test_paths_are_sorted() {
        let manifest: Manifest = vec![
            ManifestEntry::new("b", Vec::new()),
            ManifestEntry::new("a", Vec::new()),
            ManifestEntry::new("c", Vec::new()),
        ]
        .into_iter()
        .collect();
        let paths: Vec<&String> = manifest.paths().collect();
        assert_eq!(paths, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_insert_replaces() {
        let mut manifest = Manifest::new();
        assert!(manifest.insert(ManifestEntry::new("p", ids(&["x"]))).is_none());
        let old = manifest.insert(ManifestEntry::new("p", ids(&["y"])));
        assert_eq!(old.map(|e| e.ids), Some(ids(&["x"])));
        assert_eq!(manifest.len(), 1);
        assert_eq!(manifest.get("p").map(|e| e.ids.clone()), Some(ids(&["y"])));
    }

    #[test]
    fn test_retain() {
        let mut manifest: Manifest = vec![
            ManifestEntry::new("keep/a", Vec::new()),
            ManifestEntry::new("drop/b", Vec::new()),
        ]
        .into_iter()
        .collect();
        manifest.retain(|p| p.starts_with("keep/"));
        assert!(manifest.contains("keep/a"));
        assert!(!manifest.contains("drop/b"));
    }
}
