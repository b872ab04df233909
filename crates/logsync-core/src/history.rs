//! Prompt-history comparison.
//!
//! History files are JSON lines keyed by `(sessionId, timestamp)`. Unlike
//! session logs they are not compared positionally: each side is treated as
//! a set of keys and the comparison reports keys shared by both sides and
//! keys present on only one side.

use crate::{log_op_end, log_op_start};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

/// Identity of one history entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HistoryKey {
    pub session_id: String,
    pub timestamp: i64,
}

/// One line of a history file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub session_id: String,
    pub timestamp: i64,
    pub display: String,
    pub project: String,
}

impl HistoryEntry {
    pub fn key(&self) -> HistoryKey {
        HistoryKey {
            session_id: self.session_id.clone(),
            timestamp: self.timestamp,
        }
    }

    /// Display text cut to `max_chars` characters
    pub fn display_truncated(&self, max_chars: usize) -> String {
        self.display.chars().take(max_chars).collect()
    }

    /// Session id cut to its first 8 characters
    pub fn short_session_id(&self) -> &str {
        match self.session_id.char_indices().nth(8) {
            Some((idx, _)) => &self.session_id[..idx],
            None => &self.session_id,
        }
    }
}

/// Parsed history for one source, keyed and deduplicated
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedHistory {
    pub entries: BTreeMap<HistoryKey, HistoryEntry>,
    /// Non-empty lines that were not JSON or had no session id
    pub skipped: usize,
    /// Total non-empty lines read
    pub lines: usize,
}

impl ParsedHistory {
    /// Distinct session ids across all entries
    pub fn session_count(&self) -> usize {
        self.entries
            .keys()
            .map(|k| k.session_id.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }
}

fn str_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Parse one history line; `None` when it is not usable.
pub fn parse_history_line(line: &str) -> Option<HistoryEntry> {
    let value: Value = serde_json::from_str(line).ok()?;
    let session_id = str_field(&value, "sessionId");
    if session_id.is_empty() {
        return None;
    }
    Some(HistoryEntry {
        session_id,
        timestamp: value.get("timestamp").and_then(Value::as_i64).unwrap_or(0),
        display: str_field(&value, "display"),
        project: str_field(&value, "project"),
    })
}

/// Parse a history file's text.
pub fn parse_history(text: &str) -> ParsedHistory {
    let mut parsed = ParsedHistory::default();
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        parsed.lines += 1;
        match parse_history_line(line) {
            Some(entry) => {
                parsed.entries.insert(entry.key(), entry);
            }
            None => parsed.skipped += 1,
        }
    }
    parsed
}

/// Set comparison of two histories
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryComparison {
    /// Keys present on both sides
    pub shared: usize,
    /// Entries only on side A, sorted by key
    pub a_only: Vec<HistoryEntry>,
    /// Entries only on side B, sorted by key
    pub b_only: Vec<HistoryEntry>,
}

impl HistoryComparison {
    pub fn is_consistent(&self) -> bool {
        self.a_only.is_empty() && self.b_only.is_empty()
    }

    /// Distinct sessions among A-only entries
    pub fn a_only_sessions(&self) -> usize {
        distinct_sessions(&self.a_only)
    }

    /// Distinct sessions among B-only entries
    pub fn b_only_sessions(&self) -> usize {
        distinct_sessions(&self.b_only)
    }
}

fn distinct_sessions(entries: &[HistoryEntry]) -> usize {
    entries
        .iter()
        .map(|e| e.session_id.as_str())
        .collect::<BTreeSet<_>>()
        .len()
}

/// Compare two parsed histories as key sets.
pub fn compare_history(a: &ParsedHistory, b: &ParsedHistory) -> HistoryComparison {
    let start = Instant::now();
    log_op_start!(
        "compare_history",
        a_len = a.entries.len(),
        b_len = b.entries.len()
    );

    let shared = a
        .entries
        .keys()
        .filter(|k| b.entries.contains_key(*k))
        .count();
    let a_only: Vec<HistoryEntry> = a
        .entries
        .iter()
        .filter(|(k, _)| !b.entries.contains_key(*k))
        .map(|(_, e)| e.clone())
        .collect();
    let b_only: Vec<HistoryEntry> = b
        .entries
        .iter()
        .filter(|(k, _)| !a.entries.contains_key(*k))
        .map(|(_, e)| e.clone())
        .collect();

    log_op_end!(
        "compare_history",
        start,
        shared_count = shared,
        a_only = a_only.len(),
        b_only = b_only.len(),
    );

    HistoryComparison {
        shared,
        a_only,
        b_only,
    }
}

/// History comparison plus per-source parse counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryVerification {
    pub a: HistorySourceSummary,
    pub b: HistorySourceSummary,
    pub comparison: HistoryComparison,
}

/// Parse counts for one history source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySourceSummary {
    pub source_id: String,
    pub label: String,
    pub entries: usize,
    pub sessions: usize,
    pub skipped: usize,
}

impl HistorySourceSummary {
    pub fn new(
        source_id: impl Into<String>,
        label: impl Into<String>,
        parsed: &ParsedHistory,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            label: label.into(),
            entries: parsed.entries.len(),
            sessions: parsed.session_count(),
            skipped: parsed.skipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_history_line() {
        let e = parse_history_line(
            r#"{"sessionId":"abcdef123456","timestamp":17,"display":"fix bug","project":"/p"}"#,
        )
        .unwrap();
        assert_eq!(e.session_id, "abcdef123456");
        assert_eq!(e.timestamp, 17);
        assert_eq!(e.short_session_id(), "abcdef12");
    }

    #[test]
    fn test_line_without_session_is_skipped() {
        let parsed = parse_history("{\"display\":\"x\"}\nnot json\n\n");
        assert_eq!(parsed.lines, 2);
        assert_eq!(parsed.skipped, 2);
        assert!(parsed.entries.is_empty());
    }

    #[test]
    fn test_missing_timestamp_defaults_to_zero() {
        let e = parse_history_line(r#"{"sessionId":"s"}"#).unwrap();
        assert_eq!(e.timestamp, 0);
        assert_eq!(e.short_session_id(), "s");
    }

    #[test]
    fn test_duplicate_keys_collapse() {
        let parsed = parse_history(
            "{\"sessionId\":\"s\",\"timestamp\":1}\n{\"sessionId\":\"s\",\"timestamp\":1}\n",
        );
        assert_eq!(parsed.entries.len(), 1);
        assert_eq!(parsed.session_count(), 1);
    }

    #[test]
    fn test_display_truncated_counts_chars() {
        let e = HistoryEntry {
            session_id: "s".into(),
            timestamp: 0,
            display: "héllo wörld".into(),
            project: String::new(),
        };
        assert_eq!(e.display_truncated(5), "héllo");
    }
}
