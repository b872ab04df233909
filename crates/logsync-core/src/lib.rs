//! logsync core - manifest model, classifier and reporters
//!
//! This crate holds everything that does not touch the network:
//! - Manifest model and the `path|count|ids` line parser
//! - Prefix-consistency classifier over ordered id sequences
//! - Path filtering and record decoding
//! - Text and JSON reporters for session and history comparisons
//! - The error and logging facilities shared by the other crates
//!
//! Fetching lives in `logsync-fetch`; the binary lives in `logsync-cli`.

pub mod classify;
pub mod decoder;
pub mod errors;
pub mod filter;
pub mod history;
pub mod logging_facility;
pub mod model;
pub mod parser;
pub mod report;
pub mod verify;

// Re-export commonly used types
pub use classify::{compare_manifests, CategoryCounts, Classification, ComparisonResult};
pub use decoder::{JsonFieldDecoder, RecordDecoder};
pub use errors::{ExError, ExErrorKind, Result, SyncError};
pub use filter::PathFilter;
pub use history::{compare_history, parse_history, HistoryComparison, HistoryVerification};
pub use model::{Manifest, ManifestEntry, Side, SourceId};
pub use parser::{parse_manifest, ParsedManifest};
pub use report::{
    render_history_json, render_history_report, render_json, render_report, ReportOptions,
};
pub use verify::{verify_texts, FetchedSource, Verification};
