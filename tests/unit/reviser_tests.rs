/*!
 * Tests for the reviser and its failure classification
 */

use slidenotes::app_config::{ConversationStyle, ReviserConfig};
use slidenotes::errors::ReviseError;
use slidenotes::providers::mock::MockProvider;
use slidenotes::Reviser;

use crate::common::mock_providers::{MockErrorType, RecordingProvider};

fn config() -> ReviserConfig {
    ReviserConfig {
        api_key: "test-key".to_string(),
        ..ReviserConfig::default()
    }
}

#[tokio::test]
async fn test_revise_withWorkingProvider_shouldReturnText() {
    let reviser = Reviser::new(RecordingProvider::replying("- polished"), &config());
    assert_eq!(reviser.revise("## Slide 1\n\nraw").await.unwrap(), "- polished");
}

#[tokio::test]
async fn test_revise_shouldSendDocumentAndConfiguredInstruction() {
    let provider = RecordingProvider::replying("ok");
    let mut config = config();
    config.model = "gemini-test".to_string();
    config.conversation = ConversationStyle::Primed;
    let reviser = Reviser::new(provider.clone(), &config);

    reviser.revise("## Slide 1\n\nraw").await.unwrap();

    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].document, "## Slide 1\n\nraw");
    assert_eq!(requests[0].instruction, config.instruction);
    assert_eq!(requests[0].model, "gemini-test");
    assert_eq!(requests[0].conversation, ConversationStyle::Primed);
}

#[tokio::test]
async fn test_revise_withBlankDocument_shouldFailWithoutRequest() {
    let provider = RecordingProvider::replying("unused");
    let reviser = Reviser::new(provider.clone(), &config());

    assert_eq!(reviser.revise("  \n").await.unwrap_err(), ReviseError::EmptyInput);
    assert!(provider.requests().is_empty());
}

#[tokio::test]
async fn test_reviseWith_withBlankInstruction_shouldFailWithoutRequest() {
    let provider = RecordingProvider::replying("unused");
    let reviser = Reviser::new(provider.clone(), &config());

    let result = reviser.revise_with("## Slide 1\n\nraw", " ").await;
    assert_eq!(result.unwrap_err(), ReviseError::EmptyInstruction);
    assert!(provider.requests().is_empty());
}

#[tokio::test]
async fn test_revise_withRejectedKey_shouldReturnInvalidCredentials() {
    let reviser = Reviser::new(RecordingProvider::failing(MockErrorType::Auth), &config());
    assert_eq!(reviser.revise("doc").await.unwrap_err(), ReviseError::InvalidCredentials);
}

#[tokio::test]
async fn test_revise_withTransportOrServerFailure_shouldReturnServiceUnavailable() {
    for error in [MockErrorType::Connection, MockErrorType::Api] {
        let reviser = Reviser::new(RecordingProvider::failing(error), &config());
        assert_eq!(reviser.revise("doc").await.unwrap_err(), ReviseError::ServiceUnavailable);
    }
}

#[tokio::test]
async fn test_revise_withEmptyReply_shouldReturnServiceUnavailable() {
    let reviser = Reviser::new(RecordingProvider::replying("   "), &config());
    assert_eq!(reviser.revise("doc").await.unwrap_err(), ReviseError::ServiceUnavailable);
}

#[tokio::test]
async fn test_revise_afterFailure_shouldNotRetry() {
    let provider = MockProvider::unreachable();
    let reviser = Reviser::new(provider.clone(), &config());

    assert!(reviser.revise("doc").await.is_err());
    assert_eq!(provider.request_count(), 1);
}
