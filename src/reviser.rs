/*!
 * AI revision of formatted speaker notes.
 *
 * - `Reviser`: validates the request, performs exactly one provider call and
 *   classifies failures. No retry, no cache.
 * - `RevisionGate`: single-flight bookkeeping so at most one revision is
 *   outstanding per document and results for a superseded document are
 *   recognised as stale.
 */

use log::{debug, error, warn};
use parking_lot::Mutex;

use crate::app_config::ReviserConfig;
use crate::errors::ReviseError;
use crate::providers::{Provider, RevisionRequest};

/// Sends formatted documents to a provider for revision
#[derive(Debug)]
pub struct Reviser<P: Provider> {
    provider: P,
    config: ReviserConfig,
}

impl<P: Provider> Reviser<P> {
    /// Create a reviser from a provider and the startup configuration
    pub fn new(provider: P, config: &ReviserConfig) -> Self {
        Self {
            provider,
            config: config.clone(),
        }
    }

    /// The provider behind this reviser
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// The configured instructional preamble
    pub fn instruction(&self) -> &str {
        &self.config.instruction
    }

    /// Revise `document` with the configured instruction
    pub async fn revise(&self, document: &str) -> Result<String, ReviseError> {
        self.revise_with(document, &self.config.instruction).await
    }

    /// Revise `document` with an explicit instruction.
    ///
    /// # Errors
    /// `EmptyInput`/`EmptyInstruction` before any network traffic,
    /// `InvalidCredentials` or `ServiceUnavailable` after it.
    pub async fn revise_with(&self, document: &str, instruction: &str) -> Result<String, ReviseError> {
        if document.trim().is_empty() {
            return Err(ReviseError::EmptyInput);
        }
        if instruction.trim().is_empty() {
            return Err(ReviseError::EmptyInstruction);
        }

        let request = RevisionRequest {
            instruction: instruction.to_string(),
            ..RevisionRequest::from_config(&self.config, document)
        };

        debug!(
            "Requesting revision of {} chars with model {} ({})",
            document.chars().count(),
            request.model,
            request.conversation
        );

        let response = self.provider.complete(&request).await.map_err(|e| {
            error!("Revision request failed: {}", e);
            ReviseError::from(e)
        })?;

        let text = P::extract_text(&response);
        if text.trim().is_empty() {
            warn!("Provider returned no text: {}", P::raw_payload(&response));
            return Err(ReviseError::ServiceUnavailable);
        }

        Ok(text)
    }
}

/// Proof that a revision was started; compared on completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevisionTicket {
    generation: u64,
}

impl RevisionTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Default)]
struct GateState {
    generation: u64,
    in_flight: Option<u64>,
}

/// Single-flight gate for revision requests
#[derive(Debug, Default)]
pub struct RevisionGate {
    state: Mutex<GateState>,
}

impl RevisionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a revision, refusing while another one is outstanding
    pub fn begin(&self) -> Result<RevisionTicket, ReviseError> {
        let mut state = self.state.lock();
        if state.in_flight.is_some() {
            return Err(ReviseError::RevisionInProgress);
        }
        state.generation += 1;
        state.in_flight = Some(state.generation);
        Ok(RevisionTicket {
            generation: state.generation,
        })
    }

    /// Finish a revision. Returns false when the ticket is stale.
    pub fn finish(&self, ticket: RevisionTicket) -> bool {
        let mut state = self.state.lock();
        if state.in_flight == Some(ticket.generation) {
            state.in_flight = None;
            true
        } else {
            debug!("Discarding stale revision result (generation {})", ticket.generation);
            false
        }
    }

    /// Supersede any outstanding revision, e.g. because the document changed
    pub fn invalidate(&self) {
        let mut state = self.state.lock();
        state.generation += 1;
        state.in_flight = None;
    }

    /// Whether a revision is currently outstanding
    pub fn is_in_flight(&self) -> bool {
        self.state.lock().in_flight.is_some()
    }

    /// Whether `ticket` still belongs to the outstanding revision
    pub fn is_current(&self, ticket: RevisionTicket) -> bool {
        self.state.lock().in_flight == Some(ticket.generation)
    }
}
