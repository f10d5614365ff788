mod common;

use axum::http::StatusCode;
use common::TestApp;
use geodata_service::config::LlmProvider;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn chat_with_defaults_uses_sample_metrics() {
    let app = TestApp::new();

    let response = app.post_json("/chat", "").await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["message"], "ran chat");
    let text = body["response"].as_str().unwrap();
    assert!(text.starts_with("Mock response for: "));
    assert!(text.contains("Neighborhood: Avondale"));
    assert!(text.contains("Historical AQI: 120"));
}

#[tokio::test]
async fn chat_interpolates_submitted_metrics() {
    let app = TestApp::new();

    let response = app
        .post_json("/chat", r#"{"neighborhood": "Pilsen", "aqi": 88, "stores": 4}"#)
        .await;

    let body = response.json();
    let text = body["response"].as_str().unwrap();
    assert!(text.contains("Neighborhood: Pilsen"));
    assert!(text.contains("Historical AQI: 88"));
    assert!(text.contains("Grocery stores within 2 miles: 4"));
    assert!(text.contains("Tree canopy cover (%): 23"));
}

#[tokio::test]
async fn chat_relays_openai_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/responses"))
        .and(body_string_contains("Neighborhood: Avondale"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "output": [{"type": "message", "content": [
                {"type": "output_text", "text": "Suitability: No."}
            ]}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut app = TestApp::new();
    app.config.llm.provider = LlmProvider::OpenAi;
    app.config.llm.api_key = Some("sk-test".to_string());
    app.config.llm.base_url = server.uri();

    let response = app.post_json("/chat", "{}").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        json!({"message": "ran chat", "response": "Suitability: No."})
    );
}

#[tokio::test]
async fn provider_failure_is_a_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/responses"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let mut app = TestApp::new();
    app.config.llm.provider = LlmProvider::OpenAi;
    app.config.llm.api_key = Some("sk-test".to_string());
    app.config.llm.base_url = server.uri();

    let response = app.post_json("/chat", "{}").await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.json()["error"].is_string());
}
