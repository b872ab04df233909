//! Text and JSON reporters.
//!
//! The text report is meant for a terminal; the JSON report is the
//! structured [`Verification`] as-is. Neither affects the comparison.

use crate::classify::DivergedPath;
use crate::errors::Result;
use crate::history::{HistoryEntry, HistoryVerification};
use crate::verify::{SourceDiagnostics, Verification};
use serde::{Deserialize, Serialize};

/// Characters of history display text shown per entry
pub const HISTORY_DISPLAY_CHARS: usize = 50;

/// Rendering knobs shared by both reporters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOptions {
    /// Overrides the label carried by source A's diagnostics
    pub label_a: Option<String>,
    /// Overrides the label carried by source B's diagnostics
    pub label_b: Option<String>,
    /// Maximum diverged paths (or exclusive history entries per side) rendered in detail
    pub detail_limit: usize,
    /// Leading ids shown per side for each diverged path
    pub preview_count: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            label_a: None,
            label_b: None,
            detail_limit: 3,
            preview_count: 5,
        }
    }
}

/// `n` followed by the singular or plural noun
fn count_of(n: usize, one: &str, many: &str) -> String {
    format!("{} {}", n, if n == 1 { one } else { many })
}

impl ReportOptions {
    fn labels<'a>(&'a self, a: &'a str, b: &'a str) -> (&'a str, &'a str) {
        (
            self.label_a.as_deref().unwrap_or(a),
            self.label_b.as_deref().unwrap_or(b),
        )
    }
}

/// Render a human-readable session report.
pub fn render_report(v: &Verification, opts: &ReportOptions) -> String {
    let (label_a, label_b) = opts.labels(&v.a.label, &v.b.label);
    let counts = &v.result.counts;
    let mut out = String::new();

    out.push_str("=== Session Sync Verification ===\n\n");
    out.push_str(&format!("{}: {}\n", label_a, count_of(v.a.entries, "session", "sessions")));
    out.push_str(&format!("{}: {}\n\n", label_b, count_of(v.b.entries, "session", "sessions")));

    out.push_str("Results:\n");
    out.push_str(&format!("  Identical:       {}\n", counts.identical));
    out.push_str(&format!("  {} ahead:  {}\n", label_a, counts.a_ahead));
    out.push_str(&format!("  {} ahead:  {}\n", label_b, counts.b_ahead));
    out.push_str(&format!("  Diverged:        {}\n", counts.diverged));
    out.push_str(&format!("  {} only:   {}\n", label_a, counts.a_only));
    out.push_str(&format!("  {} only:   {}\n", label_b, counts.b_only));
    out.push_str(&format!("  Shared:          {}\n\n", counts.shared()));

    let shared = counts.shared();
    if shared == 0 {
        out.push_str("0 shared sessions; nothing to compare\n");
    } else if counts.diverged == 0 {
        let subject = if shared == 1 {
            "The 1 shared session is".to_string()
        } else {
            format!("All {} shared sessions are", shared)
        };
        out.push_str(&format!(
            "{} in sync (one is a prefix of the other)\n",
            subject
        ));
    } else if counts.diverged == 1 {
        out.push_str("1 session has a diverged history!\n\n");
    } else {
        out.push_str(&format!(
            "{} sessions have diverged histories!\n\n",
            counts.diverged
        ));
    }
    if counts.diverged > 0 {
        out.push_str("=== Diverged Session Details ===\n");
        for d in v.result.diverged.iter().take(opts.detail_limit) {
            render_diverged(&mut out, d, label_a, label_b, opts.preview_count);
        }
        let hidden = v.result.diverged.len().saturating_sub(opts.detail_limit);
        if hidden > 0 {
            out.push_str(&format!(
                "\n... and {} more diverged {}\n",
                hidden,
                if hidden == 1 { "session" } else { "sessions" }
            ));
        }
    }

    render_diagnostics(&mut out, &v.a, label_a);
    render_diagnostics(&mut out, &v.b, label_b);
    out
}

fn render_diverged(
    out: &mut String,
    d: &DivergedPath,
    label_a: &str,
    label_b: &str,
    preview: usize,
) {
    out.push_str(&format!("\nSession: {}\n", d.path));
    out.push_str(&format!(
        "  {} entries: {} (declared {}), {} entries: {} (declared {})\n",
        label_a,
        d.a.ids.len(),
        d.a.entry_count,
        label_b,
        d.b.ids.len(),
        d.b.entry_count
    ));
    out.push_str(&format!(
        "  Divergence at entry {} (0-indexed)\n",
        d.divergence_index
    ));
    if let (Some(id_a), Some(id_b)) = d.ids_at_divergence() {
        out.push_str(&format!("  {} id at divergence: {}\n", label_a, id_a));
        out.push_str(&format!("  {} id at divergence: {}\n", label_b, id_b));
    }
    if let Some(common) = d.last_common_id() {
        out.push_str(&format!("  Last common id: {}\n", common));
    }
    if preview > 0 {
        for (label, ids) in [(label_a, &d.a.ids), (label_b, &d.b.ids)] {
            out.push_str(&format!(
                "  {} first ids: {}\n",
                label,
                preview_ids(ids, preview)
            ));
        }
    }
}

fn preview_ids(ids: &[String], n: usize) -> String {
    let shown: Vec<&str> = ids.iter().take(n).map(String::as_str).collect();
    if ids.len() > n {
        format!("{}, ...", shown.join(", "))
    } else {
        shown.join(", ")
    }
}

fn render_diagnostics(out: &mut String, d: &SourceDiagnostics, label: &str) {
    if d.malformed.is_empty()
        && d.count_mismatches == 0
        && d.duplicates_overwritten == 0
        && d.filtered_out == 0
    {
        return;
    }
    out.push_str(&format!("\n=== Diagnostics for {} ===\n", label));
    if !d.malformed.is_empty() {
        out.push_str(&format!("  Malformed lines skipped: {}\n", d.malformed.len()));
        for note in &d.malformed {
            out.push_str(&format!("    line {}: {}\n", note.line_no, note.reason));
        }
    }
    if d.count_mismatches > 0 {
        out.push_str(&format!(
            "  Declared count differs from ids: {}\n",
            d.count_mismatches
        ));
    }
    if d.duplicates_overwritten > 0 {
        out.push_str(&format!(
            "  Duplicate paths (last kept): {}\n",
            d.duplicates_overwritten
        ));
    }
    if d.filtered_out > 0 {
        out.push_str(&format!("  Paths filtered out: {}\n", d.filtered_out));
    }
}

/// Serialize the full session verification as pretty JSON.
///
/// # Errors
///
/// `Serialization` if encoding fails.
pub fn render_json(v: &Verification) -> Result<String> {
    Ok(serde_json::to_string_pretty(v)?)
}

/// Render a human-readable history report.
pub fn render_history_report(v: &HistoryVerification, opts: &ReportOptions) -> String {
    let (label_a, label_b) = opts.labels(&v.a.label, &v.b.label);
    let c = &v.comparison;
    let mut out = String::new();

    out.push_str("=== History Verification ===\n\n");
    for (label, s) in [(label_a, &v.a), (label_b, &v.b)] {
        out.push_str(&format!(
            "{}: {} across {}",
            label,
            count_of(s.entries, "entry", "entries"),
            count_of(s.sessions, "session", "sessions")
        ));
        if s.skipped > 0 {
            out.push_str(&format!(" ({} lines skipped)", s.skipped));
        }
        out.push('\n');
    }

    out.push_str("\nResults:\n");
    out.push_str(&format!("  Identical:    {}\n", c.shared));
    out.push_str(&format!("  {} only: {}\n", label_a, c.a_only.len()));
    out.push_str(&format!("  {} only: {}\n\n", label_b, c.b_only.len()));

    if c.is_consistent() {
        if c.shared == 1 {
            out.push_str("The 1 entry is identical between both sources\n");
        } else {
            out.push_str(&format!(
                "All {} entries are identical between both sources\n",
                c.shared
            ));
        }
        return out;
    }

    let differing = c.a_only.len() + c.b_only.len();
    out.push_str(&format!(
        "{} between sources\n",
        if differing == 1 {
            "1 entry differs".to_string()
        } else {
            format!("{} entries differ", differing)
        }
    ));
    render_exclusive(&mut out, &c.a_only, label_a, opts.detail_limit);
    render_exclusive(&mut out, &c.b_only, label_b, opts.detail_limit);

    out.push_str("\n=== Session Summary ===\n");
    out.push_str(&format!(
        "  Sessions only in {}: {}\n",
        label_a,
        c.a_only_sessions()
    ));
    out.push_str(&format!(
        "  Sessions only in {}: {}\n",
        label_b,
        c.b_only_sessions()
    ));
    out
}

fn render_exclusive(out: &mut String, entries: &[HistoryEntry], label: &str, limit: usize) {
    if entries.is_empty() {
        return;
    }
    out.push_str(&format!(
        "\n=== Entries only in {} (first {}) ===\n",
        label, limit
    ));
    for e in entries.iter().take(limit) {
        out.push_str(&format!(
            "  {} | {} | {}\n",
            e.short_session_id(),
            e.timestamp,
            e.display_truncated(HISTORY_DISPLAY_CHARS)
        ));
    }
    if entries.len() > limit {
        out.push_str(&format!("  ... and {} more\n", entries.len() - limit));
    }
}

/// Serialize the full history verification as pretty JSON.
///
/// # Errors
///
/// `Serialization` if encoding fails.
pub fn render_history_json(v: &HistoryVerification) -> Result<String> {
    Ok(serde_json::to_string_pretty(v)?)
}
