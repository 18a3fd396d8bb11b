/*!
 * Recording provider for tests
 *
 * Captures every request it receives so tests can assert on what would have
 * been sent to the API, and answers with a scripted result.
 */

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use slidenotes::errors::ProviderError;
use slidenotes::providers::{Provider, RevisionRequest};

/// Type of error to simulate
#[derive(Debug, Clone, Copy)]
pub enum MockErrorType {
    /// Authentication error (invalid API key)
    Auth,
    /// Connection error
    Connection,
    /// API error with a 5xx status
    Api,
}

/// Provider that records requests and returns a fixed answer
#[derive(Debug, Clone)]
pub struct RecordingProvider {
    requests: Arc<Mutex<Vec<RevisionRequest>>>,
    reply: Result<String, MockErrorType>,
}

impl RecordingProvider {
    /// Answer every request with `text`
    pub fn replying(text: &str) -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            reply: Ok(text.to_string()),
        }
    }

    /// Fail every request with `error`
    pub fn failing(error: MockErrorType) -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            reply: Err(error),
        }
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<RevisionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for RecordingProvider {
    type Response = String;

    async fn complete(&self, request: &RevisionRequest) -> Result<Self::Response, ProviderError> {
        self.requests.lock().unwrap().push(request.clone());

        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(MockErrorType::Auth) => Err(ProviderError::AuthenticationError(
                "API key not valid".to_string(),
            )),
            Err(MockErrorType::Connection) => Err(ProviderError::ConnectionError(
                "connection refused".to_string(),
            )),
            Err(MockErrorType::Api) => Err(ProviderError::ApiError {
                status_code: 500,
                message: "internal".to_string(),
            }),
        }
    }

    fn extract_text(response: &Self::Response) -> String {
        response.clone()
    }

    fn raw_payload(response: &Self::Response) -> String {
        response.clone()
    }
}
