/*!
 * Mock provider implementations for testing.
 *
 * This module provides mock providers that simulate different behaviors:
 * - `MockProvider::working()` - Always succeeds with a revised document
 * - `MockProvider::rejecting_credentials()` - Fails the way a bad API key does
 * - `MockProvider::failing()` - Always fails with a server error
 */

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::{Provider, RevisionRequest};

/// Mock response for testing
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// The revised text
    pub text: String,
}

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a revision
    Working,
    /// Rejects the API key
    InvalidCredentials,
    /// Fails intermittently (every Nth request)
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
    /// Cannot reach the service
    Unreachable,
    /// Simulates slow response
    Slow { delay_ms: u64 },
}

/// Mock provider for testing revision behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter, shared between clones
    request_count: Arc<AtomicUsize>,
    /// Custom response generator (optional)
    custom_response: Option<fn(&RevisionRequest) -> String>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            custom_response: None,
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock provider that rejects the API key
    pub fn rejecting_credentials() -> Self {
        Self::new(MockBehavior::InvalidCredentials)
    }

    /// Create an intermittently failing mock provider
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock provider whose service cannot be reached
    pub fn unreachable() -> Self {
        Self::new(MockBehavior::Unreachable)
    }

    /// Create a mock provider that answers after `delay_ms`
    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Set a custom response generator
    pub fn with_custom_response(mut self, generator: fn(&RevisionRequest) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Default revision: every slide body gets a `[REVISED]` prefix
    pub fn generate_revision(document: &str) -> String {
        document
            .lines()
            .map(|line| {
                if line.is_empty() || line.starts_with("## ") || line == crate::notes::DELIMITER {
                    line.to_string()
                } else {
                    format!("[REVISED] {}", line)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn respond(&self, request: &RevisionRequest) -> MockResponse {
        let text = match self.custom_response {
            Some(generator) => generator(request),
            None => Self::generate_revision(&request.document),
        };
        MockResponse { text }
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
            custom_response: self.custom_response,
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    type Response = MockResponse;

    async fn complete(&self, request: &RevisionRequest) -> Result<Self::Response, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            MockBehavior::Working => Ok(self.respond(request)),

            MockBehavior::InvalidCredentials => Err(ProviderError::AuthenticationError(
                "API key not valid. Please pass a valid API key.".to_string(),
            )),

            MockBehavior::Intermittent { fail_every } => {
                if fail_every > 0 && count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                        status_code: 503,
                    })
                } else {
                    Ok(self.respond(request))
                }
            }

            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated provider failure".to_string(),
                status_code: 500,
            }),

            MockBehavior::Unreachable => Err(ProviderError::ConnectionError(
                "Simulated network failure".to_string(),
            )),

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(self.respond(request))
            }
        }
    }

    fn extract_text(response: &Self::Response) -> String {
        response.text.clone()
    }

    fn raw_payload(response: &Self::Response) -> String {
        format!("{:?}", response)
    }
}
