use crate::models::{ChatReply, ChatRequest};
use crate::services::metrics;
use crate::startup::AppState;
use axum::{body::Bytes, extract::State, Json};
use service_core::error::AppError;
use std::time::Instant;

/// Planning narrative for a neighborhood's metrics.
///
/// The body is optional; missing fields fall back to sample values.
pub async fn chat(State(state): State<AppState>, body: Bytes) -> Result<Json<ChatReply>, AppError> {
    let request = ChatRequest::from_body(&body);
    let prompt = request.planning_prompt();
    let provider = state.text_provider.name();

    let start = Instant::now();
    let response = state.text_provider.generate(&prompt).await.map_err(|e| {
        metrics::record_upstream_error(provider, e.kind());
        tracing::error!(provider, error = %e, "Text generation failed");
        AppError::InternalError(anyhow::Error::new(e))
    })?;
    metrics::record_upstream_latency(provider, start.elapsed().as_secs_f64());

    tracing::info!(
        provider,
        model = %state.text_provider.model(),
        input_tokens = response.input_tokens,
        output_tokens = response.output_tokens,
        "Generated planning narrative"
    );

    Ok(Json(ChatReply::new(response.text)))
}
