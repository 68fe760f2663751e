//! HTTP-level tests for the Gemini client against a mock server.

use std::time::Duration;

use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lumina_imagegen::quota::is_quota_exhausted;
use lumina_imagegen::{GeminiApi, GenerationOutcome, ImageClient, ImageGenError, ImageGenerator, RetryPolicy};

const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash-image:generateContent";

fn api_for(server: &MockServer) -> GeminiApi {
    GeminiApi::new(Some("test-key".into())).with_base_url(server.uri())
}

fn image_body(mime: &str, data: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": { "parts": [{ "inlineData": { "mimeType": mime, "data": data } }] }
        }]
    })
}

fn error_body(code: u16, message: &str, status: &str) -> serde_json::Value {
    json!({ "error": { "code": code, "message": message, "status": status } })
}

/// No waiting between retries in HTTP tests.
fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_retries: 1,
        backoff_base: Duration::ZERO,
    }
}

// ---------------------------------------------------------------------------
// Test: request shape and successful image extraction
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sends_prompt_aspect_ratio_and_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "contents": [{ "parts": [{ "text": "amber serum bottle" }] }],
            "generationConfig": { "imageConfig": { "aspectRatio": "1:1" } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(image_body("image/png", "iVBORw0K")))
        .expect(1)
        .mount(&server)
        .await;

    let image = api_for(&server).generate_content("amber serum bottle").await.unwrap();

    assert_eq!(image.as_deref(), Some("data:image/png;base64,iVBORw0K"));
}

#[tokio::test]
async fn reply_without_image_part_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "I can't draw that" }] } }]
        })))
        .mount(&server)
        .await;

    assert_eq!(api_for(&server).generate_content("x").await.unwrap(), None);
}

// ---------------------------------------------------------------------------
// Test: error mapping
// ---------------------------------------------------------------------------

#[tokio::test]
async fn error_body_fields_are_captured() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_json(error_body(
            429,
            "Resource has been exhausted (e.g. check quota).",
            "RESOURCE_EXHAUSTED",
        )))
        .mount(&server)
        .await;

    let err = api_for(&server).generate_content("x").await.unwrap_err();

    assert_matches!(
        &err,
        ImageGenError::Api { status: 429, reason: Some(r), .. } if r == "RESOURCE_EXHAUSTED"
    );
    assert!(is_quota_exhausted(&err));
}

#[tokio::test]
async fn non_json_error_body_is_kept_as_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = api_for(&server).generate_content("x").await.unwrap_err();

    assert_matches!(
        &err,
        ImageGenError::Api { status: 502, message, reason: None } if message == "Bad Gateway"
    );
    assert!(!is_quota_exhausted(&err));
}

// ---------------------------------------------------------------------------
// Test: retrying client over HTTP
// ---------------------------------------------------------------------------

#[tokio::test]
async fn quota_response_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_json(error_body(
            429,
            "You exceeded your current quota",
            "RESOURCE_EXHAUSTED",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = ImageClient::with_policy(api_for(&server), fast_retry());

    assert_eq!(client.generate("x").await, GenerationOutcome::QuotaExhausted);
}

#[tokio::test]
async fn server_error_then_success_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_json(error_body(
            500,
            "Internal error encountered.",
            "INTERNAL",
        )))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(image_body("image/jpeg", "/9j/4AAQ")))
        .expect(1)
        .mount(&server)
        .await;

    let client = ImageClient::with_policy(api_for(&server), fast_retry());

    assert_eq!(
        client.generate("x").await,
        GenerationOutcome::Success("data:image/jpeg;base64,/9j/4AAQ".into())
    );
}

#[tokio::test]
async fn persistent_server_error_gives_empty_after_one_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_json(error_body(
            503,
            "The model is overloaded.",
            "UNAVAILABLE",
        )))
        .expect(2)
        .mount(&server)
        .await;

    let client = ImageClient::with_policy(api_for(&server), fast_retry());

    assert_eq!(client.generate("x").await, GenerationOutcome::Empty);
}

#[tokio::test]
async fn connection_failure_is_generic_even_if_url_looks_like_quota() {
    // Grab a free port, then close it so the connect is refused.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let api = GeminiApi::new(Some("test-key".into()))
        .with_base_url(format!("http://127.0.0.1:{port}/quota-429"));

    let err = api.generate_content("x").await.unwrap_err();
    assert_matches!(&err, ImageGenError::Request(_));
    assert!(!is_quota_exhausted(&err), "classified from URL: {err}");

    let client = ImageClient::with_policy(api, fast_retry());
    assert_eq!(client.generate("x").await, GenerationOutcome::Empty);
}

#[tokio::test]
async fn undecodable_reply_is_retried_not_quota() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .expect(2)
        .mount(&server)
        .await;

    let api = GeminiApi::new(Some("test-key".into()))
        .with_base_url(format!("{}/RESOURCE_EXHAUSTED-429", server.uri()));
    let client = ImageClient::with_policy(api, fast_retry());

    assert_eq!(client.generate("x").await, GenerationOutcome::Empty);
}

#[tokio::test]
async fn missing_key_surfaces_as_generic_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_json(error_body(
            403,
            "Method doesn't allow unregistered callers.",
            "PERMISSION_DENIED",
        )))
        .expect(2)
        .mount(&server)
        .await;

    let api = GeminiApi::new(None).with_base_url(server.uri());
    let client = ImageClient::with_policy(api, fast_retry());

    assert_eq!(client.generate("x").await, GenerationOutcome::Empty);
}
