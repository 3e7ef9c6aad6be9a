//! Gateway relay tests
//!
//! - `choices[0].message.content` is translated into the canonical shape
//! - Every upstream failure maps to the fixed caller-facing message

use axum::http::{HeaderName, HeaderValue, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use prompt_relay::config::DEFAULT_UPSTREAM_ERROR_MESSAGE;

use crate::common::{constants::*, gateway_upstream, test_server};
use crate::mocks::MockGateway;

async fn post_prompt(server: &axum_test::TestServer) -> axum_test::TestResponse {
    server
        .post(OPTIMIZE_PATH)
        .json(&json!({ "prompt": TEST_PROMPT }))
        .await
}

fn assert_fixed_failure(response: &axum_test::TestResponse) {
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body, json!({ "error": DEFAULT_UPSTREAM_ERROR_MESSAGE }));
}

#[tokio::test]
async fn test_completion_is_translated_to_canonical_shape() {
    let gateway = MockGateway::start().await;
    gateway.mock_completion(TEST_GATEWAY_API_KEY, "Hello").await;
    let server = test_server(gateway_upstream(&gateway.base_url(), Some(TEST_GATEWAY_API_KEY)));

    let response = post_prompt(&server).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(
        body,
        json!({ "candidates": [{ "content": { "parts": [{ "text": "Hello" }] } }] })
    );
}

#[tokio::test]
async fn test_upstream_request_shape() {
    let gateway = MockGateway::start().await;
    gateway
        .mock_completion_for_prompt(TEST_GATEWAY_MODEL, TEST_PROMPT, "Fixed!")
        .await;
    let server = test_server(gateway_upstream(&gateway.base_url(), Some(TEST_GATEWAY_API_KEY)));

    let response = post_prompt(&server).await;
    response.assert_status_ok();

    let requests = gateway.received_requests().await;
    assert_eq!(requests.len(), 1);

    let sent: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(
        sent,
        json!({
            "model": TEST_GATEWAY_MODEL,
            "messages": [{ "role": "user", "content": TEST_PROMPT }],
            "temperature": 0.7
        })
    );
    assert_eq!(
        requests[0].headers.get("authorization").unwrap().to_str().unwrap(),
        format!("Bearer {}", TEST_GATEWAY_API_KEY)
    );
}

#[tokio::test]
async fn test_client_headers_are_not_forwarded() {
    let gateway = MockGateway::start().await;
    gateway.mock_raw_body(MockGateway::completion_body("ok")).await;
    let server = test_server(gateway_upstream(&gateway.base_url(), Some(TEST_GATEWAY_API_KEY)));

    server
        .post(OPTIMIZE_PATH)
        .add_header(
            HeaderName::from_static("x-csrf-token"),
            HeaderValue::from_static("client-token"),
        )
        .json(&json!({ "prompt": TEST_PROMPT }))
        .await
        .assert_status_ok();

    let requests = gateway.received_requests().await;
    assert!(requests[0].headers.get("x-csrf-token").is_none());
}

#[tokio::test]
async fn test_empty_choices_is_upstream_failure() {
    let gateway = MockGateway::start().await;
    gateway.mock_raw_body(json!({ "choices": [] })).await;
    let server = test_server(gateway_upstream(&gateway.base_url(), Some(TEST_GATEWAY_API_KEY)));

    assert_fixed_failure(&post_prompt(&server).await);
}

#[tokio::test]
async fn test_empty_or_null_content_is_upstream_failure() {
    for body in [
        json!({ "choices": [{ "message": { "content": "" } }] }),
        json!({ "choices": [{ "message": { "content": null } }] }),
        json!({ "choices": [{ "finish_reason": "content_filter" }] }),
        json!({}),
    ] {
        let gateway = MockGateway::start().await;
        gateway.mock_raw_body(body).await;
        let server =
            test_server(gateway_upstream(&gateway.base_url(), Some(TEST_GATEWAY_API_KEY)));

        assert_fixed_failure(&post_prompt(&server).await);
    }
}

#[tokio::test]
async fn test_error_status_is_upstream_failure_without_detail() {
    let gateway = MockGateway::start().await;
    gateway
        .mock_error(429, "Rate limit exceeded for model openai/gpt-4o-mini on key sk-internal")
        .await;
    let server = test_server(gateway_upstream(&gateway.base_url(), Some(TEST_GATEWAY_API_KEY)));

    let response = post_prompt(&server).await;

    assert_fixed_failure(&response);
    assert!(!response.text().contains("sk-internal"));
}

#[tokio::test]
async fn test_server_error_status_is_upstream_failure() {
    let gateway = MockGateway::start().await;
    gateway.mock_error(503, "overloaded").await;
    let server = test_server(gateway_upstream(&gateway.base_url(), Some(TEST_GATEWAY_API_KEY)));

    assert_fixed_failure(&post_prompt(&server).await);
}

#[tokio::test]
async fn test_non_json_body_is_upstream_failure() {
    let gateway = MockGateway::start().await;
    gateway.mock_garbage_body().await;
    let server = test_server(gateway_upstream(&gateway.base_url(), Some(TEST_GATEWAY_API_KEY)));

    assert_fixed_failure(&post_prompt(&server).await);
}

#[tokio::test]
async fn test_network_fault_is_upstream_failure() {
    // Nothing listens on the discard port
    let server = test_server(gateway_upstream(
        "http://127.0.0.1:9/v1",
        Some(TEST_GATEWAY_API_KEY),
    ));

    assert_fixed_failure(&post_prompt(&server).await);
}

#[tokio::test]
async fn test_credential_never_appears_in_responses() {
    let gateway = MockGateway::start().await;
    gateway
        .mock_error(401, &format!("Incorrect API key provided: {}", TEST_GATEWAY_API_KEY))
        .await;
    let server = test_server(gateway_upstream(&gateway.base_url(), Some(TEST_GATEWAY_API_KEY)));

    let failure = post_prompt(&server).await;
    assert!(!failure.text().contains(TEST_GATEWAY_API_KEY));

    let rejected = server.post(OPTIMIZE_PATH).await;
    assert!(!rejected.text().contains(TEST_GATEWAY_API_KEY));

    let health = server.get("/health").await;
    assert!(!health.text().contains(TEST_GATEWAY_API_KEY));
}
