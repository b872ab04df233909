//! Manifest text parser.
//!
//! Turns the raw text a fetcher returns into a [`Manifest`]. The wire format
//! is one file per line:
//!
//! ```text
//! path|count|id1,id2,...,idN,
//! ```
//!
//! Parsing never fails as a whole. Lines that do not fit the format are
//! collected as [`MalformedLine`] notes and skipped; the rest of the text is
//! still parsed.

use crate::errors::SyncError;
use crate::model::{Manifest, ManifestEntry};
use crate::{log_op_end, log_op_start};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// A skipped manifest line and why it was skipped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MalformedLine {
    /// 1-based line number in the fetched text
    pub line_no: usize,
    /// The raw line as received
    pub line: String,
    /// Human-readable reason
    pub reason: String,
}

impl From<&MalformedLine> for SyncError {
    fn from(note: &MalformedLine) -> Self {
        SyncError::MalformedLine {
            line_no: note.line_no,
            reason: note.reason.clone(),
        }
    }
}

/// Result of parsing one source's manifest text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedManifest {
    pub manifest: Manifest,
    /// Lines that were skipped, in input order
    pub malformed: Vec<MalformedLine>,
    /// Entries whose declared count differs from their id count
    pub count_mismatches: usize,
    /// Lines whose path repeated an earlier line (last one wins)
    pub duplicates_overwritten: usize,
}

impl ParsedManifest {
    /// Drop entries whose path is rejected by the predicate
    pub fn retain_paths<F>(&mut self, keep: F)
    where
        F: FnMut(&str) -> bool,
    {
        self.manifest.retain(keep);
    }
}

/// Parse one manifest line.
///
/// Returns `Ok(None)` for blank lines and `Err(reason)` for malformed ones.
pub fn parse_line(line: &str) -> std::result::Result<Option<ManifestEntry>, String> {
    let line = line.trim_end_matches('\r');
    if line.trim().is_empty() {
        return Ok(None);
    }

    let mut fields = line.splitn(3, '|');
    let (path, count, ids) = match (fields.next(), fields.next(), fields.next()) {
        (Some(path), Some(count), Some(ids)) => (path, count, ids),
        _ => {
            let found = line.split('|').count();
            return Err(format!(
                "expected 3 `|`-separated fields, found {}",
                found
            ));
        }
    };

    if path.is_empty() {
        return Err("empty path".to_string());
    }

    let entry_count: usize = count
        .trim()
        .parse()
        .map_err(|_| format!("invalid entry count `{}`", count))?;

    Ok(Some(ManifestEntry::with_count(
        path,
        entry_count,
        split_ids(ids),
    )))
}

/// Split a comma-joined id list, dropping empty tokens left by trailing separators.
///
/// Empty tokens in the middle of the list are kept; they occupy a position.
pub fn split_ids(joined: &str) -> Vec<String> {
    let mut ids: Vec<String> = joined.split(',').map(str::to_string).collect();
    while ids.last().is_some_and(|s| s.is_empty()) {
        ids.pop();
    }
    ids
}

/// Parse raw manifest text into a [`ParsedManifest`].
pub fn parse_manifest(text: &str) -> ParsedManifest {
    let start = Instant::now();
    log_op_start!("parse_manifest", bytes = text.len());

    let mut parsed = ParsedManifest::default();

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        match parse_line(line) {
            Ok(None) => {}
            Ok(Some(entry)) => {
                if let Some(previous) = parsed.manifest.insert(entry) {
                    parsed.duplicates_overwritten += 1;
                    tracing::debug!(
                        path = %previous.path,
                        line_no,
                        "duplicate manifest path, later line wins"
                    );
                }
            }
            Err(reason) => {
                tracing::warn!(line_no, reason = %reason, "skipping malformed manifest line");
                parsed.malformed.push(MalformedLine {
                    line_no,
                    line: line.to_string(),
                    reason,
                });
            }
        }
    }

    parsed.count_mismatches = parsed
        .manifest
        .entries()
        .filter(|e| e.count_mismatch())
        .count();

    log_op_end!(
        "parse_manifest",
        start,
        entry_count = parsed.manifest.len(),
        malformed_count = parsed.malformed.len(),
    );

    parsed
}
