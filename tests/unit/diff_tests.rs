/*!
 * Tests for the character diff
 */

use slidenotes::diff::{
    diff_chars, reconstruct_original, reconstruct_revised, stats, DiffKind, DiffSegment,
};

const PAIRS: &[(&str, &str)] = &[
    ("", ""),
    ("", "hello"),
    ("hello", ""),
    ("hello", "hello"),
    ("abc", "xyz"),
    ("kitten", "sitting"),
    ("## Slide 1\n\nPoint one.", "## Slide 1\n\n- Point one, summarized."),
    ("same start, different end", "same start, other ending"),
    ("日本語のノート", "日本語のメモ"),
    ("aaaa", "aa"),
];

fn assert_coalesced(segments: &[DiffSegment]) {
    for segment in segments {
        assert!(!segment.text.is_empty(), "empty segment in {:?}", segments);
    }
    for pair in segments.windows(2) {
        assert_ne!(pair[0].kind, pair[1].kind, "adjacent segments share a kind: {:?}", segments);
    }
}

#[test]
fn test_diffChars_shouldReconstructBothSides() {
    for (original, revised) in PAIRS {
        let segments = diff_chars(original, revised);
        assert_eq!(reconstruct_original(&segments), *original);
        assert_eq!(reconstruct_revised(&segments), *revised);
        assert_coalesced(&segments);
    }
}

#[test]
fn test_diffChars_withIdenticalText_shouldYieldSingleUnchanged() {
    let segments = diff_chars("hello world", "hello world");
    assert_eq!(segments, vec![DiffSegment::new(DiffKind::Unchanged, "hello world")]);
}

#[test]
fn test_diffChars_withBothEmpty_shouldYieldNothing() {
    assert!(diff_chars("", "").is_empty());
}

#[test]
fn test_diffChars_fromEmpty_shouldYieldSingleInsert() {
    assert_eq!(diff_chars("", "hello"), vec![DiffSegment::new(DiffKind::Inserted, "hello")]);
}

#[test]
fn test_diffChars_toEmpty_shouldYieldSingleRemove() {
    assert_eq!(diff_chars("hello", ""), vec![DiffSegment::new(DiffKind::Removed, "hello")]);
}

#[test]
fn test_diffChars_withNoCommonChars_shouldRemoveAllAndInsertAll() {
    let segments = diff_chars("abc", "xyz");
    let removed: String = segments.iter()
        .filter(|s| s.kind == DiffKind::Removed)
        .map(|s| s.text.as_str())
        .collect();
    let inserted: String = segments.iter()
        .filter(|s| s.kind == DiffKind::Inserted)
        .map(|s| s.text.as_str())
        .collect();

    assert_eq!(removed, "abc");
    assert_eq!(inserted, "xyz");
    assert!(segments.iter().all(|s| s.kind != DiffKind::Unchanged));
}

#[test]
fn test_diffChars_withAppendedText_shouldKeepPrefixUnchanged() {
    let segments = diff_chars("Point one.", "Point one. More.");
    assert_eq!(
        segments,
        vec![
            DiffSegment::new(DiffKind::Unchanged, "Point one."),
            DiffSegment::new(DiffKind::Inserted, " More."),
        ]
    );
}

#[test]
fn test_stats_shouldMatchReconstructedLengths() {
    let segments = diff_chars("kitten", "sitting");
    let stats = stats(&segments);
    assert_eq!(stats.unchanged + stats.removed, "kitten".chars().count());
    assert_eq!(stats.unchanged + stats.inserted, "sitting".chars().count());
}
