use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::app_config::{ConversationStyle, ReviserConfig};
use crate::errors::ProviderError;
use crate::providers::{Provider, RevisionRequest};

/// Model turn inserted after the priming instruction in `Primed` conversations
pub const PRIMING_ACKNOWLEDGEMENT: &str =
    "Understood. Send the speaker notes and I will revise them as instructed.";

/// Gemini client for the Generative Language `generateContent` API
pub struct Gemini {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API base URL
    endpoint: String,
}

impl std::fmt::Debug for Gemini {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gemini")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// generateContent request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    /// Conversation turns
    pub contents: Vec<GeminiContent>,

    /// System instruction guiding the model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<GeminiContent>,

    /// Sampling parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// One turn of content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiContent {
    /// Role of the turn author (user, model)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Content parts
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

impl GeminiContent {
    /// Text content with an optional role
    pub fn text(role: Option<&str>, text: impl Into<String>) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![GeminiPart {
                text: Some(text.into()),
            }],
        }
    }
}

/// A content part; only text parts are used
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Sampling configuration
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// generateContent response
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    /// Generated candidates
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,

    /// Feedback on the prompt, set when it was blocked
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,

    /// Token usage information
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,

    /// Body as received
    #[serde(skip)]
    pub raw: String,
}

/// One generated candidate
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
    #[serde(default)]
    pub content: Option<GeminiContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Prompt feedback block
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

/// Token usage information
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

impl GeminiRequest {
    /// Lay out a revision request according to its conversation style
    pub fn from_revision(request: &RevisionRequest) -> Self {
        let (system_instruction, contents) = match request.conversation {
            ConversationStyle::SystemInstruction => (
                Some(GeminiContent::text(None, &request.instruction)),
                vec![GeminiContent::text(Some("user"), &request.document)],
            ),
            ConversationStyle::Primed => (
                None,
                vec![
                    GeminiContent::text(Some("user"), &request.instruction),
                    GeminiContent::text(Some("model"), PRIMING_ACKNOWLEDGEMENT),
                    GeminiContent::text(Some("user"), &request.document),
                ],
            ),
        };

        Self {
            contents,
            system_instruction,
            generation_config: request.temperature.map(|temperature| GenerationConfig {
                temperature: Some(temperature),
            }),
        }
    }
}

/// Turn a non-success HTTP answer into a provider error.
///
/// The API reports a bad key as `400 INVALID_ARGUMENT` with an
/// "API key not valid" message, so the body is inspected as well as the status.
pub fn classify_error(status_code: u16, body: &str) -> ProviderError {
    let (message, status) = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => (envelope.error.message, envelope.error.status),
        Err(_) => (body.to_string(), None),
    };

    let key_rejected = message.contains("API key not valid")
        || message.contains("API_KEY_INVALID")
        || matches!(status.as_deref(), Some("UNAUTHENTICATED") | Some("PERMISSION_DENIED"))
        || status_code == 401
        || status_code == 403;

    if key_rejected {
        ProviderError::AuthenticationError(message)
    } else {
        ProviderError::ApiError {
            status_code,
            message,
        }
    }
}

impl Gemini {
    /// Create a new Gemini client
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        }
    }

    /// Create a client from the reviser settings
    pub fn from_config(config: &ReviserConfig) -> Self {
        Self::new(
            config.api_key.clone(),
            config.endpoint.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// URL of the generateContent method for `model`
    pub fn generate_url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            model
        )
    }

    /// Send a generateContent request
    pub async fn generate(&self, model: &str, request: &GeminiRequest) -> Result<GeminiResponse, ProviderError> {
        let api_url = self.generate_url(model);
        debug!("Sending generateContent request to {}", api_url);

        let response = self.client.post(&api_url)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    ProviderError::ConnectionError(e.to_string())
                } else {
                    ProviderError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response.text().await
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;

        if !status.is_success() {
            error!("Gemini API error ({}): {}", status, body);
            return Err(classify_error(status.as_u16(), &body));
        }

        let mut gemini_response: GeminiResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;
        gemini_response.raw = body;

        Ok(gemini_response)
    }

    /// Extract text from a Gemini response
    pub fn extract_text_from_response(response: &GeminiResponse) -> String {
        response.candidates.first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content.parts.iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl Provider for Gemini {
    type Response = GeminiResponse;

    async fn complete(&self, request: &RevisionRequest) -> Result<Self::Response, ProviderError> {
        let body = GeminiRequest::from_revision(request);
        let response = self.generate(&request.model, &body).await?;

        if Self::extract_text_from_response(&response).trim().is_empty() {
            let reason = response.prompt_feedback.as_ref()
                .and_then(|feedback| feedback.block_reason.clone())
                .or_else(|| response.candidates.first().and_then(|c| c.finish_reason.clone()))
                .unwrap_or_else(|| "no candidates".to_string());
            return Err(ProviderError::EmptyResponse(reason));
        }

        Ok(response)
    }

    fn extract_text(response: &Self::Response) -> String {
        Self::extract_text_from_response(response)
    }

    fn raw_payload(response: &Self::Response) -> String {
        response.raw.clone()
    }
}
