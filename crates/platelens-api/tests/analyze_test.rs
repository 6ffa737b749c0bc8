//! Analyze endpoint integration tests.
//!
//! The vision backend is replaced with a canned-reply fake; the image fetch
//! stage runs against a throwaway local HTTP server.

mod helpers;

use helpers::{setup_test_app, setup_test_app_with_reply, spawn_image_server};
use axum::http::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn test_blank_image_url_rejected() {
    let app = setup_test_app_with_reply("{\"items\":[]}").await;

    for body in [json!({ "imageUrl": "" }), json!({ "imageUrl": "   " }), json!({})] {
        let response = app.server.post("/api/analyze").json(&body).await;
        response.assert_status_bad_request();
        let body: Value = response.json();
        assert!(
            body["error"].as_str().unwrap().contains("required"),
            "error should mention 'required': {}",
            body["error"]
        );
    }
}

#[tokio::test]
async fn test_non_string_image_url_rejected() {
    let app = setup_test_app_with_reply("{\"items\":[]}").await;

    let response = app
        .server
        .post("/api/analyze")
        .json(&json!({ "imageUrl": 42 }))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("Invalid request body"));
}

#[tokio::test]
async fn test_missing_credential_is_server_error() {
    // No vision backend configured at all
    let app = setup_test_app(None).await;

    let response = app
        .server
        .post("/api/analyze")
        .json(&json!({ "imageUrl": "http://127.0.0.1:1/a.png" }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("ANTHROPIC_API_KEY"));
}

#[tokio::test]
async fn test_fenced_model_reply_parsed_and_returned_verbatim() {
    let image_url = spawn_image_server("/img.png", b"png bytes".to_vec()).await;
    let reply = "```json\n{\"items\":[{\"name\":\"apple\",\"estimatedGrams\":150}]}\n```";
    let app = setup_test_app_with_reply(reply).await;

    let response = app
        .server
        .post("/api/analyze")
        .json(&json!({ "imageUrl": image_url }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(
        body,
        json!({"items":[{"name":"apple","estimatedGrams":150}]})
    );
}

#[tokio::test]
async fn test_null_grams_round_trip() {
    let image_url = spawn_image_server("/bowl.jpg", b"jpg bytes".to_vec()).await;
    let reply = r#"{"items":[{"name":"soup","estimatedGrams":null},{"name":"bread","estimatedGrams":80}]}"#;
    let app = setup_test_app_with_reply(reply).await;

    let response = app
        .server
        .post("/api/analyze")
        .json(&json!({ "imageUrl": image_url }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["items"][0]["estimatedGrams"], Value::Null);
    assert_eq!(body["items"][1]["estimatedGrams"], json!(80));
}

#[tokio::test]
async fn test_string_grams_fail_shape_validation() {
    let image_url = spawn_image_server("/pie.png", b"png bytes".to_vec()).await;
    let reply = r#"{"items":[{"name":"apple","estimatedGrams":"150"}]}"#;
    let app = setup_test_app_with_reply(reply).await;

    let response = app
        .server
        .post("/api/analyze")
        .json(&json!({ "imageUrl": image_url }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("shape validation"), "got: {}", error);
    assert!(error.contains("estimatedGrams"), "got: {}", error);
}

#[tokio::test]
async fn test_prose_reply_reports_raw_snippet() {
    let image_url = spawn_image_server("/stew.png", b"png bytes".to_vec()).await;
    let reply = "Looks like a hearty beef stew with carrots.";
    let app = setup_test_app_with_reply(reply).await;

    let response = app
        .server
        .post("/api/analyze")
        .json(&json!({ "imageUrl": image_url }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("not valid JSON"), "got: {}", error);
    assert!(error.contains("hearty beef stew"), "got: {}", error);
}

#[tokio::test]
async fn test_unreachable_image_url_is_client_error() {
    let app = setup_test_app_with_reply("{\"items\":[]}").await;

    // Port 1 is essentially never listening locally
    let response = app
        .server
        .post("/api/analyze")
        .json(&json!({ "imageUrl": "http://127.0.0.1:1/img.png" }))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("Failed to fetch image"));
}

#[tokio::test]
async fn test_upstream_404_is_client_error() {
    let image_url = spawn_image_server("/real.png", b"png bytes".to_vec()).await;
    let missing_url = image_url.replace("/real.png", "/missing.png");
    let app = setup_test_app_with_reply("{\"items\":[]}").await;

    let response = app
        .server
        .post("/api/analyze")
        .json(&json!({ "imageUrl": missing_url }))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("404"));
}
