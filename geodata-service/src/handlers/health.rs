use crate::startup::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Liveness probe.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "ok": true,
        "service": "geodata-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness probe: the processed directory exists and the text provider is usable.
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let data_ready = tokio::fs::metadata(state.layers.processed_dir())
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false);

    match (data_ready, state.text_provider.health_check().await) {
        (true, Ok(())) => StatusCode::OK,
        (data_ready, provider) => {
            tracing::warn!(
                data_ready,
                provider_error = ?provider.err(),
                "Service not ready"
            );
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// Serves `index.html` from the static directory when present.
pub async fn home(State(state): State<AppState>) -> Response {
    let index = state.config.data.static_dir.join("index.html");
    match tokio::fs::read_to_string(&index).await {
        Ok(html) => Html(html).into_response(),
        Err(_) => Json(json!({
            "message": "Backend running. Try /cca25?city=chicago or POST /chat"
        }))
        .into_response(),
    }
}

pub async fn metrics() -> impl IntoResponse {
    crate::services::metrics::get_metrics()
}
