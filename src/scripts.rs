/*!
 * Google Apps Script helpers for reading and writing speaker notes.
 *
 * Scripts are generated from three fixed skeletons. Every interpolated
 * value is emitted as a JSON literal, which is also a valid JavaScript
 * literal, so user text cannot break out of the script syntax.
 */

use std::fmt;
use std::num::NonZeroU32;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;
use url::Url;

use crate::errors::ScriptError;
use crate::notes;

/// `/presentation/d/<ID>` inside a Google Slides URL
static PRESENTATION_PATH_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"presentation/d/([A-Za-z0-9_-]+)").unwrap()
});

/// A bare presentation ID
static PRESENTATION_ID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]+$").unwrap()
});

/// Template placeholders, substituted in a single pass
static PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{(presentation_id|notes|font_family|font_size)\}").unwrap()
});

/// Font families offered by the tool; any other family name is accepted too
pub const KNOWN_FONT_FAMILIES: &[&str] = &[
    "Arial",
    "Roboto",
    "Open Sans",
    "Lato",
    "Montserrat",
    "Georgia",
    "Times New Roman",
    "Verdana",
    "Courier New",
    "Noto Sans JP",
    "M PLUS 1p",
];

const EXTRACT_TEMPLATE: &str = r##"function getSpeakerNotes() {
  try {
    const presentationId = {presentation_id};
    const presentation = SlidesApp.openById(presentationId);
    const slides = presentation.getSlides();
    const allNotes = [];

    slides.forEach((slide) => {
      const notes = slide.getNotesPage().getSpeakerNotesShape().getText().asString();
      allNotes.push(notes.trim());
    });

    const output = allNotes.join('\n---\n');
    Logger.log(output);

    // SlidesApp cannot show modal dialogs, so the notes go to a sidebar.
    const escaped = output
      .replace(/&/g, '&amp;')
      .replace(/</g, '&lt;')
      .replace(/\n/g, '&#10;');
    const htmlContent = '<h3>Speaker notes to copy:</h3>' +
                        '<textarea style="width: 95%; height: 80vh;" readonly>' +
                        escaped +
                        '</textarea>' +
                        '<p>Copy the text above and paste it into slidenotes.</p>';

    const html = HtmlService.createHtmlOutput(htmlContent)
      .setTitle('Speaker notes');

    SlidesApp.getUi().showSidebar(html);
  } catch (e) {
    Logger.log('Error: ' + e.toString());
    SlidesApp.getUi().alert('An error occurred. Check that the presentation ID is correct and that you have access to it.');
  }
}"##;

const BULK_UPDATE_TEMPLATE: &str = r##"function updateSpeakerNotes() {
  const presentationId = {presentation_id};
  const notes = {notes};
  const fontFamily = {font_family};
  const fontSize = {font_size};

  try {
    const presentation = SlidesApp.openById(presentationId);
    const slides = presentation.getSlides();
    const count = Math.min(slides.length, notes.length);

    for (let i = 0; i < count; i++) {
      const text = slides[i].getNotesPage().getSpeakerNotesShape().getText();
      text.setText(notes[i]);
      const style = text.getTextStyle();
      if (fontFamily) {
        style.setFontFamily(fontFamily);
      }
      if (fontSize) {
        style.setFontSize(fontSize);
      }
    }

    if (notes.length !== slides.length) {
      Logger.log('Note count (' + notes.length + ') does not match slide count (' + slides.length + '). Unmatched entries were skipped.');
    }
    SlidesApp.getUi().alert('Updated speaker notes on ' + count + ' slide(s).');
  } catch (e) {
    Logger.log('Error: ' + e.toString());
    SlidesApp.getUi().alert('An error occurred. Check that the presentation ID is correct and that you can edit it.');
  }
}"##;

const CLEAR_TEMPLATE: &str = r##"function clearSpeakerNotes() {
  const presentationId = {presentation_id};

  try {
    const presentation = SlidesApp.openById(presentationId);
    const slides = presentation.getSlides();

    slides.forEach((slide) => {
      slide.getNotesPage().getSpeakerNotesShape().getText().clear();
    });

    SlidesApp.getUi().alert('Cleared speaker notes on ' + slides.length + ' slide(s).');
  } catch (e) {
    Logger.log('Error: ' + e.toString());
    SlidesApp.getUi().alert('An error occurred. Check that the presentation ID is correct and that you can edit it.');
  }
}"##;

/// The fixed set of script skeletons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptKind {
    /// Read every slide's notes, joined with delimiter lines
    Extract,
    /// Overwrite notes slide by slide from a payload
    BulkUpdate,
    /// Remove the notes from every slide
    Clear,
}

impl ScriptKind {
    /// All script kinds in display order
    pub const ALL: [ScriptKind; 3] = [Self::Extract, Self::BulkUpdate, Self::Clear];

    /// Function the user selects in the Apps Script editor before running
    pub fn entry_point(&self) -> &'static str {
        match self {
            Self::Extract => "getSpeakerNotes",
            Self::BulkUpdate => "updateSpeakerNotes",
            Self::Clear => "clearSpeakerNotes",
        }
    }

    fn template(&self) -> &'static str {
        match self {
            Self::Extract => EXTRACT_TEMPLATE,
            Self::BulkUpdate => BULK_UPDATE_TEMPLATE,
            Self::Clear => CLEAR_TEMPLATE,
        }
    }

    /// Steps for running the script in the host application
    pub fn instructions(&self) -> Vec<String> {
        let mut steps = vec![
            "Open the presentation in Google Slides and choose Extensions > Apps Script.".to_string(),
            "Delete any existing code in the editor and paste this script.".to_string(),
            format!("Select the `{}` function and click Run.", self.entry_point()),
            "Authorize the script when asked on the first run.".to_string(),
        ];
        match self {
            Self::Extract => steps.push(
                "Copy the notes from the sidebar that opens and paste them into slidenotes.".to_string(),
            ),
            Self::BulkUpdate => steps.push(
                "Check the speaker notes of each slide; unmatched entries are listed in the execution log.".to_string(),
            ),
            Self::Clear => steps.push(
                "All speaker notes are removed. Use the editor's undo history to revert.".to_string(),
            ),
        }
        steps
    }
}

impl fmt::Display for ScriptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Extract => write!(f, "extract"),
            Self::BulkUpdate => write!(f, "update"),
            Self::Clear => write!(f, "clear"),
        }
    }
}

/// A validated Google Slides presentation identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentationId(String);

impl PresentationId {
    /// Accept either a presentation URL or a bare ID
    pub fn parse(input: &str) -> Result<Self, ScriptError> {
        let input = input.trim();

        let id = match Url::parse(input) {
            Ok(url) => PRESENTATION_PATH_REGEX
                .captures(url.path())
                .map(|caps| caps[1].to_string()),
            Err(_) => PRESENTATION_PATH_REGEX
                .captures(input)
                .map(|caps| caps[1].to_string())
                .or_else(|| {
                    PRESENTATION_ID_REGEX
                        .is_match(input)
                        .then(|| input.to_string())
                }),
        };

        id.map(Self)
            .ok_or_else(|| ScriptError::InvalidPresentationId(input.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PresentationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for PresentationId {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Values substituted into a script skeleton
#[derive(Debug, Clone)]
pub struct ScriptParams {
    pub presentation_id: PresentationId,
    pub font_family: Option<String>,
    pub font_size: Option<NonZeroU32>,
    pub notes: Option<String>,
}

impl ScriptParams {
    pub fn new(presentation_id: PresentationId) -> Self {
        Self {
            presentation_id,
            font_family: None,
            font_size: None,
            notes: None,
        }
    }

    /// Set the font family; blank names are ignored
    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        let family = family.into();
        let family = family.trim();
        self.font_family = (!family.is_empty()).then(|| family.to_string());
        self
    }

    /// Set the font size in points
    pub fn with_font_size(mut self, size: NonZeroU32) -> Self {
        self.font_size = Some(size);
        self
    }

    /// Set the raw notes payload, delimited like the formatter input
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Script text plus the function the user has to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedScript {
    pub kind: ScriptKind,
    pub entry_point: &'static str,
    pub code: String,
}

fn js_literal<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

/// Split a notes payload into per-slide texts using the formatter's rule
pub fn payload_segments(payload: &str) -> Result<Vec<String>, ScriptError> {
    let segments: Vec<String> = notes::segment(payload)
        .into_iter()
        .map(|block| block.text)
        .collect();

    if segments.is_empty() {
        return Err(ScriptError::MalformedNotesPayload);
    }
    Ok(segments)
}

/// Render the `kind` skeleton with `params`.
///
/// # Errors
/// `MalformedNotesPayload` when a bulk update has no payload or the payload
/// has no slide content.
pub fn generate(kind: ScriptKind, params: &ScriptParams) -> Result<GeneratedScript, ScriptError> {
    let notes_literal = match kind {
        ScriptKind::BulkUpdate => {
            let payload = params.notes.as_deref().unwrap_or_default();
            js_literal(&payload_segments(payload)?)
        }
        _ => "[]".to_string(),
    };

    let presentation_id = js_literal(params.presentation_id.as_str());
    let font_family = js_literal(&params.font_family);
    let font_size = js_literal(&params.font_size.map(NonZeroU32::get));

    let code = PLACEHOLDER_REGEX
        .replace_all(kind.template(), |caps: &Captures| match &caps[1] {
            "presentation_id" => presentation_id.clone(),
            "notes" => notes_literal.clone(),
            "font_family" => font_family.clone(),
            "font_size" => font_size.clone(),
            other => format!("{{{}}}", other),
        })
        .into_owned();

    Ok(GeneratedScript {
        kind,
        entry_point: kind.entry_point(),
        code,
    })
}
