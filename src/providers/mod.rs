/*!
 * Provider implementations for the revision service.
 *
 * This module contains the client seam used by the reviser:
 * - Gemini: Google Generative Language API integration
 * - Mock: scripted behaviours for tests and dry runs
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::app_config::{ConversationStyle, ReviserConfig};
use crate::errors::ProviderError;

/// Provider-neutral description of one revision call
#[derive(Debug, Clone, PartialEq)]
pub struct RevisionRequest {
    /// Model identifier
    pub model: String,
    /// Instructional preamble
    pub instruction: String,
    /// Formatted document to revise
    pub document: String,
    /// Sampling temperature, provider default when `None`
    pub temperature: Option<f32>,
    /// How instruction and document are laid out
    pub conversation: ConversationStyle,
}

impl RevisionRequest {
    /// Build a request for `document` using the reviser settings
    pub fn from_config(config: &ReviserConfig, document: impl Into<String>) -> Self {
        Self {
            model: config.model.clone(),
            instruction: config.instruction.clone(),
            document: document.into(),
            temperature: Some(config.temperature),
            conversation: config.conversation,
        }
    }
}

/// Common trait for all text-generation providers
///
/// The reviser only sees the narrow surface below; provider response shapes
/// never leak past `extract_text` and `raw_payload`.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// The response type for this provider
    type Response: Send + Sync;

    /// Complete a request using this provider
    ///
    /// # Arguments
    /// * `request` - The revision to perform
    ///
    /// # Returns
    /// * `Result<Self::Response, ProviderError>` - The response from the provider or an error
    async fn complete(&self, request: &RevisionRequest) -> Result<Self::Response, ProviderError>;

    /// Extract the generated text from the provider response
    fn extract_text(response: &Self::Response) -> String;

    /// Raw response payload, for diagnostics only
    fn raw_payload(response: &Self::Response) -> String;
}

pub mod gemini;
pub mod mock;
