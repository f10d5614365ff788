//! Application startup and lifecycle management.

use crate::config::GeodataConfig;
use crate::handlers::{chat, health, layers, pollution};
use crate::services::providers::{self, TextProvider};
use crate::services::{metrics, AirQualityClient, LayerStore};
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{request_id_middleware, request_span};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: GeodataConfig,
    pub layers: LayerStore,
    pub text_provider: Arc<dyn TextProvider>,
    pub air_quality: AirQualityClient,
}

impl AppState {
    /// Wires services from configuration.
    pub fn from_config(config: GeodataConfig) -> Result<Self, AppError> {
        let text_provider = providers::from_config(&config.llm)?;
        let air_quality = AirQualityClient::new(config.epa.clone())
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!("EPA HTTP client: {}", e)))?;

        if config.epa.credentials().is_none() {
            tracing::warn!("EPA_API_EMAIL/EPA_API_KEY not set; /pollutiondata will return 400");
        }

        Ok(Self {
            layers: LayerStore::new(config.data.processed_dir.clone()),
            text_provider,
            air_quality,
            config,
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health::home))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/metrics", get(health::metrics))
        .route("/cca25", get(layers::cca25))
        .route("/cca25/names", get(layers::area_names))
        .route("/cca25/area", get(layers::area))
        .route("/food_access", get(layers::food_access))
        .route("/pollutiondata", get(pollution::pollution_data))
        .route("/chat", post(chat::chat))
        .nest_service("/static", ServeDir::new(&state.config.data.static_dir))
        .layer(from_fn(metrics::track_http_metrics))
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(request_span::<axum::body::Body>))
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: GeodataConfig) -> Result<Self, AppError> {
        metrics::init_metrics()
            .map_err(|e| AppError::InternalError(anyhow::anyhow!("metrics: {}", e)))?;

        // Port 0 = random port for testing
        let addr = config.common.socket_addr()?;
        let state = AppState::from_config(config)?;

        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            port,
            processed_dir = %state.config.data.processed_dir.display(),
            "Geodata service listening"
        );

        Ok(Self {
            port,
            listener,
            router: build_router(state),
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until a shutdown signal arrives.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                std::io::Error::other(format!("HTTP server error: {}", e))
            })
    }
}
