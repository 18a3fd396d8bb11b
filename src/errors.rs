/*!
 * Error types for the slidenotes application.
 *
 * Each error's `Display` output is the message shown to the user, so the
 * wording is kept short and actionable. Transport-level details live in
 * `ProviderError` and are classified into `ReviseError` by the reviser.
 */

use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The API answered successfully but produced no text
    #[error("API returned an empty response: {0}")]
    EmptyResponse(String),
}

impl ProviderError {
    /// Whether the remote service rejected the caller's credentials
    pub fn is_credential_rejection(&self) -> bool {
        match self {
            Self::AuthenticationError(_) => true,
            Self::ApiError { status_code, .. } => *status_code == 401 || *status_code == 403,
            _ => false,
        }
    }
}

/// Errors raised while segmenting and formatting raw notes
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Input was empty or whitespace only
    #[error("Paste your speaker notes first.")]
    EmptyInput,

    /// Input only contained delimiters and blank space
    #[error(
        "No valid slide content found. Make sure slides are separated by '---' on a line of its own."
    )]
    NoValidSlides,
}

/// Errors surfaced by a revision request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReviseError {
    /// No formatted document to revise
    #[error("Convert the notes to markdown before revising them.")]
    EmptyInput,

    /// The instructional preamble is empty
    #[error("The revision instruction is empty. Check the reviser configuration.")]
    EmptyInstruction,

    /// The remote service rejected the API key
    #[error("The provided API key is invalid. Check your configuration.")]
    InvalidCredentials,

    /// The remote service could not be reached or failed
    #[error(
        "Failed to get a response from the AI. The service may be temporarily unavailable."
    )]
    ServiceUnavailable,

    /// Another revision for the same document is still outstanding
    #[error("A revision is already in progress for this document.")]
    RevisionInProgress,
}

impl From<ProviderError> for ReviseError {
    fn from(error: ProviderError) -> Self {
        if error.is_credential_rejection() {
            Self::InvalidCredentials
        } else {
            Self::ServiceUnavailable
        }
    }
}

/// Errors raised while generating helper scripts
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// The notes payload produced no slide segments
    #[error(
        "The notes payload contains no slide content. Separate each slide's notes with '---' on a line of its own."
    )]
    MalformedNotesPayload,

    /// The presentation URL or identifier could not be understood
    #[error("Invalid Google Slides URL or presentation ID: '{0}'")]
    InvalidPresentationId(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from formatting notes
    #[error("{0}")]
    Format(#[from] FormatError),

    /// Error from a revision request
    #[error("{0}")]
    Revise(#[from] ReviseError),

    /// Error from script generation
    #[error("{0}")]
    Script(#[from] ScriptError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
