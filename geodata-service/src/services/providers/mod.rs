//! Text generation provider abstractions and implementations.
//!
//! The planning narrative only needs prompt-in, text-out, so providers are
//! swapped behind the [`TextProvider`] trait (OpenAI in production, mock in
//! tests and offline development).

pub mod mock;
pub mod openai;

use crate::config::{LlmConfig, LlmProvider};
use async_trait::async_trait;
use service_core::error::AppError;
use std::sync::Arc;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Network error: {0}")]
    NetworkError(String),
}

impl ProviderError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::NotConfigured(_) => "not_configured",
            ProviderError::ApiError(_) => "api_error",
            ProviderError::RateLimited => "rate_limited",
            ProviderError::NetworkError(_) => "network_error",
        }
    }
}

/// Result of a completed generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderResponse {
    pub text: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// Trait for text generation providers.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Provider label for logs and metrics.
    fn name(&self) -> &'static str;

    fn model(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<ProviderResponse, ProviderError>;

    async fn health_check(&self) -> Result<(), ProviderError>;
}

/// Builds the provider selected by configuration.
pub fn from_config(config: &LlmConfig) -> Result<Arc<dyn TextProvider>, AppError> {
    let provider: Arc<dyn TextProvider> = match config.provider {
        LlmProvider::OpenAi => {
            let api_key = config.api_key.clone().ok_or_else(|| {
                AppError::ConfigError(anyhow::anyhow!("OPENAI_API_KEY is required but not set"))
            })?;
            let openai = openai::OpenAiTextProvider::new(openai::OpenAiConfig {
                api_key,
                model: config.model.clone(),
                base_url: config.base_url.clone(),
            })
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?;
            Arc::new(openai)
        }
        LlmProvider::Mock => Arc::new(mock::MockTextProvider::new(true)),
    };

    tracing::info!(
        provider = provider.name(),
        model = %provider.model(),
        "Initialized text provider"
    );

    Ok(provider)
}
