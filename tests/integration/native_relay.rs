//! Native relay tests
//!
//! - The upstream body is forwarded byte-for-byte with `200`, whatever the
//!   upstream status
//! - Failures produce `Failed to fetch from <label>`

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use prompt_relay::relay::HarmBlockThreshold;

use crate::common::{constants::*, native_upstream, test_server};
use crate::mocks::MockNative;

async fn post_prompt(server: &axum_test::TestServer) -> axum_test::TestResponse {
    server
        .post(OPTIMIZE_PATH)
        .json(&json!({ "prompt": TEST_PROMPT }))
        .await
}

#[tokio::test]
async fn test_canonical_body_is_forwarded_byte_for_byte() {
    let native = MockNative::start().await;
    let raw = MockNative::candidates_body("Hello there");
    native.mock_raw(TEST_NATIVE_API_KEY, 200, &raw).await;
    let server = test_server(native_upstream(&native.base_url(), Some(TEST_NATIVE_API_KEY), None));

    let response = post_prompt(&server).await;

    response.assert_status_ok();
    assert_eq!(response.text(), raw);
    assert_eq!(
        response.headers().get("content-type").unwrap().to_str().unwrap(),
        "application/json"
    );
}

#[tokio::test]
async fn test_upstream_request_shape_without_safety_settings() {
    let native = MockNative::start().await;
    native
        .mock_for_request_body(
            json!({ "contents": [{ "parts": [{ "text": TEST_PROMPT }] }] }),
            "ok",
        )
        .await;
    let server = test_server(native_upstream(&native.base_url(), Some(TEST_NATIVE_API_KEY), None));

    post_prompt(&server).await.assert_status_ok();

    let requests = native.received_requests().await;
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
    assert!(requests[0]
        .url
        .query_pairs()
        .any(|(k, v)| k == "key" && v == TEST_NATIVE_API_KEY));
}

#[tokio::test]
async fn test_safety_threshold_is_sent_when_configured() {
    let native = MockNative::start().await;
    native
        .mock_for_request_body(
            json!({
                "contents": [{ "parts": [{ "text": TEST_PROMPT }] }],
                "safetySettings": [
                    { "category": "HARM_CATEGORY_HARASSMENT", "threshold": "BLOCK_NONE" },
                    { "category": "HARM_CATEGORY_HATE_SPEECH", "threshold": "BLOCK_NONE" },
                    { "category": "HARM_CATEGORY_SEXUALLY_EXPLICIT", "threshold": "BLOCK_NONE" },
                    { "category": "HARM_CATEGORY_DANGEROUS_CONTENT", "threshold": "BLOCK_NONE" }
                ]
            }),
            "ok",
        )
        .await;
    let server = test_server(native_upstream(
        &native.base_url(),
        Some(TEST_NATIVE_API_KEY),
        Some(HarmBlockThreshold::BlockNone),
    ));

    post_prompt(&server).await.assert_status_ok();
}

#[tokio::test]
async fn test_upstream_error_body_is_forwarded_with_ok_status() {
    let native = MockNative::start().await;
    let raw = MockNative::invalid_key_body().to_string();
    native.mock_raw(TEST_NATIVE_API_KEY, 400, &raw).await;
    let server = test_server(native_upstream(&native.base_url(), Some(TEST_NATIVE_API_KEY), None));

    let response = post_prompt(&server).await;

    response.assert_status_ok();
    assert_eq!(response.text(), raw);
}

#[tokio::test]
async fn test_rate_limited_upstream_is_forwarded_with_ok_status() {
    let native = MockNative::start().await;
    let raw = json!({ "error": { "code": 429, "message": "Resource exhausted" } }).to_string();
    native.mock_raw(TEST_NATIVE_API_KEY, 429, &raw).await;
    let server = test_server(native_upstream(&native.base_url(), Some(TEST_NATIVE_API_KEY), None));

    let response = post_prompt(&server).await;

    response.assert_status_ok();
    assert_eq!(response.text(), raw);
}

#[tokio::test]
async fn test_non_json_body_is_generic_failure() {
    let native = MockNative::start().await;
    native
        .mock_raw(TEST_NATIVE_API_KEY, 502, "<html>Bad Gateway</html>")
        .await;
    let server = test_server(native_upstream(&native.base_url(), Some(TEST_NATIVE_API_KEY), None));

    let response = post_prompt(&server).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body, json!({ "error": "Failed to fetch from Gemini" }));
}

#[tokio::test]
async fn test_network_fault_is_generic_failure() {
    let server = test_server(native_upstream(
        "http://127.0.0.1:9/v1beta",
        Some(TEST_NATIVE_API_KEY),
        None,
    ));

    let response = post_prompt(&server).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["error"], "Failed to fetch from Gemini");
    assert!(!response.text().contains(TEST_NATIVE_API_KEY));
}

#[tokio::test]
async fn test_echoed_credential_is_not_forwarded() {
    let native = MockNative::start().await;
    let raw = json!({
        "error": {
            "code": 400,
            "message": format!("API key {} not valid", TEST_NATIVE_API_KEY)
        }
    })
    .to_string();
    native.mock_raw(TEST_NATIVE_API_KEY, 400, &raw).await;
    let server = test_server(native_upstream(&native.base_url(), Some(TEST_NATIVE_API_KEY), None));

    let response = post_prompt(&server).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!response.text().contains(TEST_NATIVE_API_KEY));
    let body: Value = response.json();
    assert_eq!(body["error"], "Failed to fetch from Gemini");
}
