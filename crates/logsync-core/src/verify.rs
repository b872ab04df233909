//! One verification run over two already-fetched manifest texts.
//!
//! Fetching is the caller's job. This module parses both texts, applies the
//! path filter and classifies; parse diagnostics travel next to the result.

use crate::classify::{compare_manifests, ComparisonResult};
use crate::filter::PathFilter;
use crate::model::SourceId;
use crate::parser::{parse_manifest, MalformedLine, ParsedManifest};
use serde::{Deserialize, Serialize};

/// Non-fatal parse findings for one source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDiagnostics {
    /// Source handle as given by the caller
    pub source_id: String,
    /// Display label for reports
    pub label: String,
    /// Entries kept after filtering
    pub entries: usize,
    /// Entries removed by the path filter
    pub filtered_out: usize,
    pub malformed: Vec<MalformedLine>,
    pub count_mismatches: usize,
    pub duplicates_overwritten: usize,
}

impl SourceDiagnostics {
    fn new(source: &SourceId, label: String, parsed: &ParsedManifest, before: usize) -> Self {
        Self {
            source_id: source.as_str().to_string(),
            label,
            entries: parsed.manifest.len(),
            filtered_out: before - parsed.manifest.len(),
            malformed: parsed.malformed.clone(),
            count_mismatches: parsed
                .manifest
                .entries()
                .filter(|e| e.count_mismatch())
                .count(),
            duplicates_overwritten: parsed.duplicates_overwritten,
        }
    }
}

/// Comparison result plus per-source diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verification {
    pub a: SourceDiagnostics,
    pub b: SourceDiagnostics,
    pub result: ComparisonResult,
}

impl Verification {
    pub fn is_consistent(&self) -> bool {
        self.result.is_consistent()
    }
}

/// A source's handle, display label and fetched manifest text
#[derive(Debug, Clone)]
pub struct FetchedSource<'a> {
    pub source: &'a SourceId,
    pub label: String,
    pub text: &'a str,
}

impl<'a> FetchedSource<'a> {
    /// Use the source's default label
    pub fn new(source: &'a SourceId, text: &'a str) -> Self {
        Self {
            source,
            label: source.label(),
            text,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

fn parse_and_filter(
    fetched: &FetchedSource<'_>,
    filter: &PathFilter,
) -> (ParsedManifest, SourceDiagnostics) {
    let mut parsed = parse_manifest(fetched.text);
    let before = parsed.manifest.len();
    if !filter.is_all() {
        parsed.retain_paths(|p| filter.matches(p));
    }
    let diagnostics =
        SourceDiagnostics::new(fetched.source, fetched.label.clone(), &parsed, before);
    (parsed, diagnostics)
}

/// Parse, filter and classify two fetched manifests.
pub fn verify_texts(
    a: &FetchedSource<'_>,
    b: &FetchedSource<'_>,
    filter: &PathFilter,
) -> Verification {
    let (parsed_a, diag_a) = parse_and_filter(a, filter);
    let (parsed_b, diag_b) = parse_and_filter(b, filter);
    let result = compare_manifests(&parsed_a.manifest, &parsed_b.manifest);
    Verification {
        a: diag_a,
        b: diag_b,
        result,
    }
}
