/*!
 * Speaker note segmentation and markdown formatting.
 *
 * Raw notes are split into per-slide pieces on delimiter lines (a line made
 * of exactly `---`), trimmed, stripped of empty pieces and numbered from 1.
 * The script generator reuses [`segment`] so both features agree on what a
 * slide boundary is.
 */

use std::fmt;

use crate::errors::FormatError;

/// Delimiter line marking a boundary between two slides
pub const DELIMITER: &str = "---";

/// Separator placed between rendered blocks
pub const BLOCK_SEPARATOR: &str = "\n\n---\n\n";

/// Default heading label, rendered as `## Slide N`
pub const DEFAULT_SLIDE_LABEL: &str = "Slide";

/// One slide's worth of notes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteBlock {
    /// 1-based position among the surviving blocks
    pub index: usize,
    /// Trimmed note text
    pub text: String,
}

/// Ordered blocks ready to be rendered as markdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedDocument {
    blocks: Vec<NoteBlock>,
    label: String,
}

impl FormattedDocument {
    /// The blocks in slide order
    pub fn blocks(&self) -> &[NoteBlock] {
        &self.blocks
    }

    /// Number of slides in the document
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false for a document built by [`NoteFormatter`]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Render the document to its markdown string
    pub fn render(&self) -> String {
        self.blocks
            .iter()
            .map(|block| format!("## {} {}\n\n{}", self.label, block.index, block.text))
            .collect::<Vec<_>>()
            .join(BLOCK_SEPARATOR)
    }
}

impl fmt::Display for FormattedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end_matches(['\n', '\r']) == DELIMITER
}

/// Split raw text on delimiter lines, keeping every piece untrimmed.
///
/// The returned slices borrow from `raw`; a delimiter at the very start or
/// end of the input produces an empty piece on that side.
pub fn split_raw(raw: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut offset = 0;

    for line in raw.split_inclusive('\n') {
        let end = offset + line.len();
        if is_delimiter(line) {
            pieces.push(&raw[start..offset]);
            start = end;
        }
        offset = end;
    }
    pieces.push(&raw[start..]);

    pieces
}

/// Segment raw text into numbered note blocks.
///
/// Empty pieces are dropped; order is preserved and duplicates are kept.
pub fn segment(raw: &str) -> Vec<NoteBlock> {
    split_raw(raw)
        .into_iter()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .enumerate()
        .map(|(i, text)| NoteBlock {
            index: i + 1,
            text: text.to_string(),
        })
        .collect()
}

/// Formats raw speaker notes into the slide markdown dialect
#[derive(Debug, Clone)]
pub struct NoteFormatter {
    label: String,
}

impl Default for NoteFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_SLIDE_LABEL)
    }
}

impl NoteFormatter {
    /// Create a formatter using `label` for the slide headings
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        let label = if label.trim().is_empty() {
            DEFAULT_SLIDE_LABEL.to_string()
        } else {
            label.trim().to_string()
        };
        Self { label }
    }

    /// Heading label in use
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Segment `raw` into a document.
    ///
    /// # Errors
    /// `EmptyInput` for blank input, `NoValidSlides` when only delimiters remain.
    pub fn parse(&self, raw: &str) -> Result<FormattedDocument, FormatError> {
        if raw.trim().is_empty() {
            return Err(FormatError::EmptyInput);
        }

        let blocks = segment(raw);
        if blocks.is_empty() {
            return Err(FormatError::NoValidSlides);
        }

        Ok(FormattedDocument {
            blocks,
            label: self.label.clone(),
        })
    }

    /// Segment and render `raw` in one step
    pub fn format(&self, raw: &str) -> Result<String, FormatError> {
        self.parse(raw).map(|doc| doc.render())
    }
}

/// Format raw notes with the default `Slide` label
pub fn format_notes(raw: &str) -> Result<String, FormatError> {
    NoteFormatter::default().format(raw)
}
