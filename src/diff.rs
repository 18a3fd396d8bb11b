/*!
 * Character-level diff between formatted notes and their AI revision.
 *
 * The alignment itself comes from `similar` (Myers). This module coalesces
 * the per-character changes into runs and renders them for display.
 */

use serde::{Deserialize, Serialize};
use similar::{Algorithm, ChangeTag, TextDiff};

/// Classification of a diff run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    /// Present in both strings
    Unchanged,
    /// Only present in the revised string
    Inserted,
    /// Only present in the original string
    Removed,
}

impl From<ChangeTag> for DiffKind {
    fn from(tag: ChangeTag) -> Self {
        match tag {
            ChangeTag::Equal => Self::Unchanged,
            ChangeTag::Insert => Self::Inserted,
            ChangeTag::Delete => Self::Removed,
        }
    }
}

/// A maximal run of characters sharing one classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSegment {
    pub kind: DiffKind,
    pub text: String,
}

impl DiffSegment {
    pub fn new(kind: DiffKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Character counts per classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffStats {
    pub unchanged: usize,
    pub inserted: usize,
    pub removed: usize,
}

impl DiffStats {
    /// Whether the two inputs were identical
    pub fn is_identical(&self) -> bool {
        self.inserted == 0 && self.removed == 0
    }
}

/// Compute the coalesced character diff from `original` to `revised`.
///
/// No returned segment is empty and no two neighbours share a kind.
pub fn diff_chars(original: &str, revised: &str) -> Vec<DiffSegment> {
    let diff = TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .diff_chars(original, revised);

    let mut segments: Vec<DiffSegment> = Vec::new();
    for change in diff.iter_all_changes() {
        let kind = DiffKind::from(change.tag());
        let value = change.value();
        if value.is_empty() {
            continue;
        }
        match segments.last_mut() {
            Some(last) if last.kind == kind => last.text.push_str(value),
            _ => segments.push(DiffSegment::new(kind, value)),
        }
    }

    segments
}

/// Rebuild the original string from a segment sequence
pub fn reconstruct_original(segments: &[DiffSegment]) -> String {
    segments
        .iter()
        .filter(|s| s.kind != DiffKind::Inserted)
        .map(|s| s.text.as_str())
        .collect()
}

/// Rebuild the revised string from a segment sequence
pub fn reconstruct_revised(segments: &[DiffSegment]) -> String {
    segments
        .iter()
        .filter(|s| s.kind != DiffKind::Removed)
        .map(|s| s.text.as_str())
        .collect()
}

/// Count characters per classification
pub fn stats(segments: &[DiffSegment]) -> DiffStats {
    segments.iter().fold(DiffStats::default(), |mut acc, s| {
        let count = s.text.chars().count();
        match s.kind {
            DiffKind::Unchanged => acc.unchanged += count,
            DiffKind::Inserted => acc.inserted += count,
            DiffKind::Removed => acc.removed += count,
        }
        acc
    })
}

/// Render segments with ANSI colours: green for insertions, struck-through red for removals
pub fn render_ansi(segments: &[DiffSegment]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment.kind {
            DiffKind::Unchanged => out.push_str(&segment.text),
            DiffKind::Inserted => {
                out.push_str("\x1B[32m");
                out.push_str(&segment.text);
                out.push_str("\x1B[0m");
            }
            DiffKind::Removed => {
                out.push_str("\x1B[9;31m");
                out.push_str(&segment.text);
                out.push_str("\x1B[0m");
            }
        }
    }
    out
}

/// Render segments with inline `[-removed-]` and `{+inserted+}` markers
pub fn render_inline(segments: &[DiffSegment]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment.kind {
            DiffKind::Unchanged => out.push_str(&segment.text),
            DiffKind::Inserted => {
                out.push_str("{+");
                out.push_str(&segment.text);
                out.push_str("+}");
            }
            DiffKind::Removed => {
                out.push_str("[-");
                out.push_str(&segment.text);
                out.push_str("-]");
            }
        }
    }
    out
}
