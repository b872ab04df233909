//! Comparison output types.
//!
//! All types implement `Debug, Clone, Serialize, Deserialize, PartialEq`.
//! Per-path collections are kept in lexicographic path order so serialized
//! output is deterministic.

use crate::model::{ManifestEntry, Side};
use serde::{Deserialize, Serialize};

/// How one path relates across the two sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classification {
    /// Id sequences are equal element for element
    Identical,
    /// One sequence is a strict prefix of the other; `side` holds the longer one
    AheadOf {
        /// The side with more entries
        side: Side,
        /// How many more entries the ahead side has
        by: usize,
    },
    /// Neither sequence is a prefix of the other
    Diverged {
        /// First position where the sequences differ (0-based)
        index: usize,
        a_len: usize,
        b_len: usize,
    },
    /// Path is listed only by source A
    OnlyInA,
    /// Path is listed only by source B
    OnlyInB,
}

impl Classification {
    /// True when both sources list the path
    pub fn is_shared(&self) -> bool {
        !matches!(self, Classification::OnlyInA | Classification::OnlyInB)
    }

    /// Short lowercase label used in logs and tables
    pub fn label(&self) -> &'static str {
        match self {
            Classification::Identical => "identical",
            Classification::AheadOf { side: Side::A, .. } => "a_ahead",
            Classification::AheadOf { side: Side::B, .. } => "b_ahead",
            Classification::Diverged { .. } => "diverged",
            Classification::OnlyInA => "a_only",
            Classification::OnlyInB => "b_only",
        }
    }
}

/// Per-category path counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub identical: usize,
    pub a_ahead: usize,
    pub b_ahead: usize,
    pub diverged: usize,
    pub a_only: usize,
    pub b_only: usize,
}

impl CategoryCounts {
    /// Add one path's classification to the tally
    pub fn record(&mut self, classification: &Classification) {
        match classification {
            Classification::Identical => self.identical += 1,
            Classification::AheadOf { side: Side::A, .. } => self.a_ahead += 1,
            Classification::AheadOf { side: Side::B, .. } => self.b_ahead += 1,
            Classification::Diverged { .. } => self.diverged += 1,
            Classification::OnlyInA => self.a_only += 1,
            Classification::OnlyInB => self.b_only += 1,
        }
    }

    /// Paths present in both manifests
    pub fn shared(&self) -> usize {
        self.identical + self.a_ahead + self.b_ahead + self.diverged
    }

    /// Every path in the union of both manifests
    pub fn total(&self) -> usize {
        self.shared() + self.a_only + self.b_only
    }

    /// Shared paths that are identical or in a prefix relation
    pub fn in_sync(&self) -> usize {
        self.identical + self.a_ahead + self.b_ahead
    }
}

/// Classification of a single path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathOutcome {
    pub path: String,
    pub classification: Classification,
}

/// Detail kept for every diverged path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivergedPath {
    pub path: String,
    /// First position where the id sequences differ (0-based)
    pub divergence_index: usize,
    pub a: ManifestEntry,
    pub b: ManifestEntry,
}

impl DivergedPath {
    /// Id on each side at the divergence point
    pub fn ids_at_divergence(&self) -> (Option<&str>, Option<&str>) {
        (
            self.a.ids.get(self.divergence_index).map(String::as_str),
            self.b.ids.get(self.divergence_index).map(String::as_str),
        )
    }

    /// Last id both sides agree on, if the divergence is not at position 0
    pub fn last_common_id(&self) -> Option<&str> {
        self.divergence_index
            .checked_sub(1)
            .and_then(|i| self.a.ids.get(i))
            .map(String::as_str)
    }
}

/// Full result of comparing two manifests
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub counts: CategoryCounts,
    /// One outcome per path in the union, lexicographic by path
    pub outcomes: Vec<PathOutcome>,
    /// Every diverged path, lexicographic by path
    pub diverged: Vec<DivergedPath>,
}

impl ComparisonResult {
    /// True when no shared path has diverged
    pub fn is_consistent(&self) -> bool {
        self.counts.diverged == 0
    }

    /// Look up the classification recorded for a path
    pub fn classification_of(&self, path: &str) -> Option<Classification> {
        self.outcomes
            .binary_search_by(|o| o.path.as_str().cmp(path))
            .ok()
            .map(|i| self.outcomes[i].classification)
    }
}
