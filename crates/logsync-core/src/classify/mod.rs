//! Prefix-consistency classifier.
//!
//! Joins two manifests and assigns every path one of identical, A-ahead,
//! B-ahead, diverged, A-only or B-only.
//!
//! ## Entry point
//!
//! ```
//! use logsync_core::classify::compare_manifests;
//! use logsync_core::parser::parse_manifest;
//!
//! let a = parse_manifest("p|3|u1,u2,u3,\n");
//! let b = parse_manifest("p|2|u1,u2,\n");
//! let result = compare_manifests(&a.manifest, &b.manifest);
//! assert_eq!(result.counts.a_ahead, 1);
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: identical inputs produce identical results, in
//!   lexicographic path order.
//! - **Positional comparison**: ids are compared element by element, never
//!   as joined strings.
//! - **Symmetry**: swapping the inputs swaps A/B categories and leaves
//!   identical/diverged counts unchanged.

pub mod engine;
pub mod model;

pub use engine::{classify_ids, classify_pair, compare_manifests, first_mismatch};
pub use model::{CategoryCounts, Classification, ComparisonResult, DivergedPath, PathOutcome};
