use log::{debug, info, warn};
use parking_lot::Mutex;

use crate::app_config::Config;
use crate::diff::{self, DiffSegment};
use crate::errors::{FormatError, ReviseError, ScriptError};
use crate::notes::NoteFormatter;
use crate::providers::Provider;
use crate::reviser::{RevisionGate, Reviser};
use crate::scripts::{self, GeneratedScript, ScriptKind, ScriptParams};

// @module: Workspace controller holding the current notes session

/// Result of a revision call as seen by the workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevisionOutcome {
    /// The revision was applied to the workspace
    Applied(String),
    /// The document changed while the request was outstanding; result dropped
    Stale,
}

#[derive(Debug, Default)]
struct Workspace {
    formatted: Option<String>,
    revised: Option<String>,
}

/// Main application controller
///
/// Owns the formatted document and its revision, and routes every user
/// action through the pure core modules.
#[derive(Debug)]
pub struct Controller<P: Provider> {
    // @field: App configuration
    config: Config,
    formatter: NoteFormatter,
    reviser: Reviser<P>,
    gate: RevisionGate,
    workspace: Mutex<Workspace>,
}

impl<P: Provider> Controller<P> {
    // @method: Create a new controller with the given configuration and provider
    pub fn with_provider(config: Config, provider: P) -> Self {
        let formatter = NoteFormatter::new(config.format.slide_label.clone());
        let reviser = Reviser::new(provider, &config.reviser);
        Self {
            config,
            formatter,
            reviser,
            gate: RevisionGate::new(),
            workspace: Mutex::new(Workspace::default()),
        }
    }

    /// Configuration the controller was built with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The reviser used for revision requests
    pub fn reviser(&self) -> &Reviser<P> {
        &self.reviser
    }

    /// Currently displayed formatted document
    pub fn formatted(&self) -> Option<String> {
        self.workspace.lock().formatted.clone()
    }

    /// Currently displayed revision
    pub fn revised(&self) -> Option<String> {
        self.workspace.lock().revised.clone()
    }

    /// Whether a revision request is outstanding
    pub fn is_revising(&self) -> bool {
        self.gate.is_in_flight()
    }

    /// Convert raw notes into the formatted document.
    ///
    /// Previous outputs are cleared first and any outstanding revision
    /// becomes stale, whether or not the conversion succeeds.
    pub fn convert(&self, raw_notes: &str) -> Result<String, FormatError> {
        self.gate.invalidate();
        {
            let mut workspace = self.workspace.lock();
            workspace.formatted = None;
            workspace.revised = None;
        }

        let document = self.formatter.parse(raw_notes)?;
        let rendered = document.render();
        info!("Formatted {} slide(s)", document.len());

        self.workspace.lock().formatted = Some(rendered.clone());
        Ok(rendered)
    }

    /// Revise the current formatted document.
    ///
    /// On failure the formatted document is left untouched and no partial
    /// revision is shown.
    pub async fn revise(&self) -> Result<RevisionOutcome, ReviseError> {
        let document = self.formatted().ok_or(ReviseError::EmptyInput)?;

        let ticket = self.gate.begin()?;
        self.workspace.lock().revised = None;

        let result = self.reviser.revise(&document).await;

        if !self.gate.finish(ticket) {
            warn!("Ignoring revision result for a superseded document");
            return Ok(RevisionOutcome::Stale);
        }

        let revised = result?;
        debug!("Revision applied ({} chars)", revised.chars().count());
        self.workspace.lock().revised = Some(revised.clone());
        Ok(RevisionOutcome::Applied(revised))
    }

    /// Diff between the formatted document and its revision, if both exist
    pub fn diff(&self) -> Option<Vec<DiffSegment>> {
        let workspace = self.workspace.lock();
        match (&workspace.formatted, &workspace.revised) {
            (Some(formatted), Some(revised)) => Some(diff::diff_chars(formatted, revised)),
            _ => None,
        }
    }

    /// Generate a helper script
    pub fn script(&self, kind: ScriptKind, params: &ScriptParams) -> Result<GeneratedScript, ScriptError> {
        let script = scripts::generate(kind, params)?;
        info!("Generated {} script (entry point: {})", kind, script.entry_point);
        Ok(script)
    }
}
