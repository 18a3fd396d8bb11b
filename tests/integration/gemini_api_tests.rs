/*!
 * Gemini client tests against a local mock server
 *
 * No real API traffic: every request goes to a wiremock server.
 */

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use slidenotes::app_config::{ConversationStyle, ReviserConfig};
use slidenotes::errors::{ProviderError, ReviseError};
use slidenotes::providers::gemini::Gemini;
use slidenotes::providers::{Provider, RevisionRequest};
use slidenotes::{Controller, Reviser};

use crate::common::test_config;

const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

fn reviser_config(endpoint: &str) -> ReviserConfig {
    ReviserConfig {
        api_key: "test-key".to_string(),
        endpoint: endpoint.to_string(),
        timeout_secs: 5,
        ..ReviserConfig::default()
    }
}

fn success_body(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }],
        "usageMetadata": { "promptTokenCount": 12, "candidatesTokenCount": 8 }
    })
}

#[tokio::test]
async fn test_gemini_complete_shouldSendKeyAndSystemInstruction() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "systemInstruction": { "parts": [{ "text": "Summarize." }] },
            "contents": [{ "role": "user", "parts": [{ "text": "## Slide 1\n\nHello" }] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body("- Hello, summarized")))
        .expect(1)
        .mount(&server)
        .await;

    let config = reviser_config(&server.uri());
    let gemini = Gemini::from_config(&config);
    let request = RevisionRequest {
        instruction: "Summarize.".to_string(),
        ..RevisionRequest::from_config(&config, "## Slide 1\n\nHello")
    };

    let response = gemini.complete(&request).await.unwrap();
    assert_eq!(Gemini::extract_text(&response), "- Hello, summarized");
    assert!(Gemini::raw_payload(&response).contains("candidatesTokenCount"));
    assert_eq!(response.usage_metadata.unwrap().candidates_token_count, 8);
}

#[tokio::test]
async fn test_gemini_primedConversation_shouldSendThreeTurns() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_partial_json(json!({
            "contents": [
                { "role": "user" },
                { "role": "model" },
                { "role": "user", "parts": [{ "text": "doc" }] }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body("done")))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = reviser_config(&server.uri());
    config.conversation = ConversationStyle::Primed;
    let reviser = Reviser::new(Gemini::from_config(&config), &config);

    assert_eq!(reviser.revise("doc").await.unwrap(), "done");
}

#[tokio::test]
async fn test_gemini_invalidKey_shouldSurfaceInvalidCredentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "code": 400,
                "message": "API key not valid. Please pass a valid API key.",
                "status": "INVALID_ARGUMENT"
            }
        })))
        .mount(&server)
        .await;

    let mut config = test_config();
    config.reviser.endpoint = server.uri();
    let provider = Gemini::from_config(&config.reviser);
    let controller = Controller::with_provider(config, provider);

    let formatted = controller.convert("Point one.\n---\nPoint two.").unwrap();
    let error = controller.revise().await.unwrap_err();

    assert_eq!(error, ReviseError::InvalidCredentials);
    assert_eq!(controller.formatted(), Some(formatted));
}

#[tokio::test]
async fn test_gemini_serverError_shouldSurfaceServiceUnavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "error": { "code": 503, "message": "The model is overloaded.", "status": "UNAVAILABLE" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = reviser_config(&server.uri());
    let gemini = Gemini::from_config(&config);

    match gemini.complete(&RevisionRequest::from_config(&config, "doc")).await {
        Err(ProviderError::ApiError { status_code, .. }) => assert_eq!(status_code, 503),
        other => panic!("Unexpected result: {:?}", other.map(|r| r.raw)),
    }

    let reviser = Reviser::new(Gemini::from_config(&config), &config);
    server.reset().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    assert_eq!(reviser.revise("doc").await.unwrap_err(), ReviseError::ServiceUnavailable);
}

#[tokio::test]
async fn test_gemini_blockedPrompt_shouldBeEmptyResponse() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        })))
        .mount(&server)
        .await;

    let config = reviser_config(&server.uri());
    let gemini = Gemini::from_config(&config);

    match gemini.complete(&RevisionRequest::from_config(&config, "doc")).await {
        Err(ProviderError::EmptyResponse(reason)) => assert_eq!(reason, "SAFETY"),
        other => panic!("Unexpected result: {:?}", other.map(|r| r.raw)),
    }
}

#[tokio::test]
async fn test_gemini_malformedBody_shouldBeParseError() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let config = reviser_config(&server.uri());
    let gemini = Gemini::from_config(&config);
    let result = gemini.complete(&RevisionRequest::from_config(&config, "doc")).await;

    assert!(matches!(result, Err(ProviderError::ParseError(_))));
}

#[tokio::test]
async fn test_gemini_unreachableEndpoint_shouldSurfaceServiceUnavailable() {
    let config = reviser_config("http://127.0.0.1:9");
    let gemini = Gemini::new(&config.api_key, &config.endpoint, Duration::from_secs(2));
    let reviser = Reviser::new(gemini, &config);

    assert_eq!(reviser.revise("doc").await.unwrap_err(), ReviseError::ServiceUnavailable);
}
