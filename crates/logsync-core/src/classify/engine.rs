//! Prefix-consistency classification engine.
//!
//! The core entry point is [`compare_manifests`], which joins two parsed
//! manifests and classifies every path in their union.

use crate::classify::model::{
    CategoryCounts, Classification, ComparisonResult, DivergedPath, PathOutcome,
};
use crate::model::{Manifest, ManifestEntry, Side};
use crate::{log_op_end, log_op_start};
use std::collections::BTreeSet;
use std::time::Instant;

/// First index at which the two sequences differ, comparing up to the shorter length.
///
/// Returns `None` when one sequence is a prefix of the other (including equality).
pub fn first_mismatch(a: &[String], b: &[String]) -> Option<usize> {
    a.iter().zip(b.iter()).position(|(x, y)| x != y)
}

/// Classify two id sequences that are both present.
///
/// Comparison is positional and exact: identifiers are compared as whole
/// strings, case-sensitive, with no normalisation.
pub fn classify_ids(a: &[String], b: &[String]) -> Classification {
    match first_mismatch(a, b) {
        Some(index) => Classification::Diverged {
            index,
            a_len: a.len(),
            b_len: b.len(),
        },
        None if a.len() == b.len() => Classification::Identical,
        None if a.len() > b.len() => Classification::AheadOf {
            side: Side::A,
            by: a.len() - b.len(),
        },
        None => Classification::AheadOf {
            side: Side::B,
            by: b.len() - a.len(),
        },
    }
}

/// Classify one path given its (optional) entry on each side.
///
/// The declared `entry_count` is never consulted; only the id sequences are.
pub fn classify_pair(a: Option<&ManifestEntry>, b: Option<&ManifestEntry>) -> Classification {
    match (a, b) {
        (Some(a), Some(b)) => classify_ids(&a.ids, &b.ids),
        (Some(_), None) => Classification::OnlyInA,
        // A path absent from both sides never reaches here from compare_manifests;
        // treat it like an exclusive B path rather than panicking.
        (None, _) => Classification::OnlyInB,
    }
}

/// Compare two manifests and classify every path in the union of their keys.
///
/// Paths are visited in lexicographic order, so `outcomes` and `diverged`
/// are stable across runs regardless of how the manifests were built.
pub fn compare_manifests(a: &Manifest, b: &Manifest) -> ComparisonResult {
    let start = Instant::now();
    log_op_start!("compare_manifests", a_len = a.len(), b_len = b.len());

    let all_paths: BTreeSet<&String> = a.paths().chain(b.paths()).collect();

    let mut counts = CategoryCounts::default();
    let mut outcomes = Vec::with_capacity(all_paths.len());
    let mut diverged = Vec::new();

    for path in all_paths {
        let a_entry = a.get(path);
        let b_entry = b.get(path);
        let classification = classify_pair(a_entry, b_entry);
        counts.record(&classification);

        if let (Classification::Diverged { index, .. }, Some(a_entry), Some(b_entry)) =
            (&classification, a_entry, b_entry)
        {
            tracing::debug!(path = %path, index, "diverged session");
            diverged.push(DivergedPath {
                path: path.clone(),
                divergence_index: *index,
                a: a_entry.clone(),
                b: b_entry.clone(),
            });
        }

        outcomes.push(PathOutcome {
            path: path.clone(),
            classification,
        });
    }

    log_op_end!(
        "compare_manifests",
        start,
        shared_count = counts.shared(),
        diverged_count = counts.diverged,
    );

    ComparisonResult {
        counts,
        outcomes,
        diverged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_identical() {
        assert_eq!(
            classify_ids(&ids(&["u1", "u2"]), &ids(&["u1", "u2"])),
            Classification::Identical
        );
    }

    #[test]
    fn test_both_empty_identical() {
        assert_eq!(classify_ids(&[], &[]), Classification::Identical);
    }

    #[test]
    fn test_empty_vs_non_empty_is_ahead() {
        assert_eq!(
            classify_ids(&[], &ids(&["u1"])),
            Classification::AheadOf { side: Side::B, by: 1 }
        );
    }

    #[test]
    fn test_joined_string_prefix_is_not_a_sequence_prefix() {
        // "a,ab" is a string prefix of "a,abc" but not an element-wise prefix
        let c = classify_ids(&ids(&["a", "ab"]), &ids(&["a", "abc"]));
        assert_eq!(
            c,
            Classification::Diverged {
                index: 1,
                a_len: 2,
                b_len: 2
            }
        );
    }

    #[test]
    fn test_case_sensitive() {
        assert!(matches!(
            classify_ids(&ids(&["U1"]), &ids(&["u1"])),
            Classification::Diverged { index: 0, .. }
        ));
    }

    #[test]
    fn test_classify_pair_exclusive() {
        let e = ManifestEntry::new("p", ids(&["u1"]));
        assert_eq!(classify_pair(Some(&e), None), Classification::OnlyInA);
        assert_eq!(classify_pair(None, Some(&e)), Classification::OnlyInB);
    }

    #[test]
    fn test_classify_pair_ignores_declared_count() {
        let a = ManifestEntry::with_count("p", 10, ids(&["u1"]));
        let b = ManifestEntry::with_count("p", 1, ids(&["u1"]));
        assert_eq!(classify_pair(Some(&a), Some(&b)), Classification::Identical);
    }

    #[test]
    fn test_first_mismatch() {
        assert_eq!(first_mismatch(&ids(&["a", "b"]), &ids(&["a", "c"])), Some(1));
        assert_eq!(first_mismatch(&ids(&["a"]), &ids(&["a", "c"])), None);
    }
}
