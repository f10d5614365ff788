//! Shared fixtures for geodata-service integration tests.

#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use geodata_service::config::{
    DataConfig, EpaConfig, GeodataConfig, LlmConfig, LlmProvider,
};
use geodata_service::startup::{build_router, AppState};
use serde_json::Value;
use service_core::config::Config;
use std::path::Path;
use tempfile::TempDir;
use tower::ServiceExt;

/// Router over a temporary processed directory and a static directory.
pub struct TestApp {
    pub processed: TempDir,
    pub static_dir: TempDir,
    pub config: GeodataConfig,
}

impl TestApp {
    pub fn new() -> Self {
        let processed = TempDir::new().expect("processed dir");
        let static_dir = TempDir::new().expect("static dir");
        let config = test_config(processed.path(), static_dir.path());
        Self {
            processed,
            static_dir,
            config,
        }
    }

    pub fn write_layer(&self, file_name: &str, body: &str) {
        std::fs::write(self.processed.path().join(file_name), body).expect("write layer");
    }

    pub fn router(&self) -> Router {
        let state = AppState::from_config(self.config.clone()).expect("state builds");
        build_router(state)
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        send(self.router(), Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn post_json(&self, uri: &str, body: &str) -> TestResponse {
        let request = Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        send(self.router(), request).await
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response is JSON")
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("response is UTF-8")
    }
}

async fn send(router: Router, request: Request<Body>) -> TestResponse {
    let response = router.oneshot(request).await.expect("router responds");
    let status = response.status();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads")
        .to_vec();
    TestResponse {
        status,
        content_type,
        body,
    }
}

pub fn test_config(processed_dir: &Path, static_dir: &Path) -> GeodataConfig {
    GeodataConfig {
        common: Config {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        log_level: "debug".to_string(),
        otlp_endpoint: None,
        data: DataConfig {
            processed_dir: processed_dir.to_path_buf(),
            static_dir: static_dir.to_path_buf(),
            default_city: "chicago".to_string(),
        },
        llm: LlmConfig {
            provider: LlmProvider::Mock,
            api_key: None,
            model: "mock-model".to_string(),
            base_url: "http://127.0.0.1:9".to_string(),
        },
        epa: EpaConfig {
            email: None,
            key: None,
            base_url: "http://127.0.0.1:9".to_string(),
            param: "88101".to_string(),
            bdate: "20160101".to_string(),
            edate: "20160229".to_string(),
            state: "17".to_string(),
            county: "031".to_string(),
        },
    }
}
