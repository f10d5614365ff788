//! Prometheus metrics for geodata-service.
//!
//! Provides HTTP, layer read and upstream (OpenAI, EPA) metrics.

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::{Mutex, OnceLock};
use std::time::Instant;

// Global registry
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

// HTTP metrics
pub static HTTP_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static HTTP_REQUEST_DURATION_SECONDS: OnceLock<HistogramVec> = OnceLock::new();

// Layer metrics
pub static LAYER_READS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

// Upstream metrics
pub static UPSTREAM_REQUEST_DURATION_SECONDS: OnceLock<HistogramVec> = OnceLock::new();
pub static UPSTREAM_ERRORS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

static INIT_LOCK: Mutex<()> = Mutex::new(());

/// Initialize all metrics. Safe to call more than once; only the first call registers.
pub fn init_metrics() -> Result<(), prometheus::Error> {
    let _guard = INIT_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    if REGISTRY.get().is_some() {
        return Ok(());
    }

    let registry = Registry::new();

    let http_requests_total = IntCounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests"),
        &["method", "path", "status"],
    )?;

    let http_request_duration = HistogramVec::new(
        HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 30.0]),
        &["method", "path"],
    )?;

    // outcome: served, absent
    let layer_reads = IntCounterVec::new(
        Opts::new("layer_reads_total", "Processed layer reads by outcome"),
        &["layer", "outcome"],
    )?;

    let upstream_duration = HistogramVec::new(
        HistogramOpts::new(
            "upstream_request_duration_seconds",
            "Upstream API latency in seconds",
        )
        .buckets(vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0, 120.0]),
        &["upstream"],
    )?;

    let upstream_errors = IntCounterVec::new(
        Opts::new("upstream_errors_total", "Total upstream API errors"),
        &["upstream", "error_type"],
    )?;

    registry.register(Box::new(http_requests_total.clone()))?;
    registry.register(Box::new(http_request_duration.clone()))?;
    registry.register(Box::new(layer_reads.clone()))?;
    registry.register(Box::new(upstream_duration.clone()))?;
    registry.register(Box::new(upstream_errors.clone()))?;

    let _ = REGISTRY.set(registry);
    let _ = HTTP_REQUESTS_TOTAL.set(http_requests_total);
    let _ = HTTP_REQUEST_DURATION_SECONDS.set(http_request_duration);
    let _ = LAYER_READS_TOTAL.set(layer_reads);
    let _ = UPSTREAM_REQUEST_DURATION_SECONDS.set(upstream_duration);
    let _ = UPSTREAM_ERRORS_TOTAL.set(upstream_errors);

    tracing::info!("Prometheus metrics initialized");
    Ok(())
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();

    let registry = match REGISTRY.get() {
        Some(r) => r,
        None => {
            tracing::error!("Metrics registry not initialized");
            return "# Metrics registry not initialized\n".to_string();
        }
    };

    let metric_families = registry.gather();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return format!("# Failed to encode metrics: {}\n", e);
    }

    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Failed to convert metrics to UTF-8");
            format!("# Failed to convert metrics to UTF-8: {}\n", e)
        }
    }
}

/// Record a completed HTTP request.
pub fn record_http_request(method: &str, path: &str, status: &str, duration_secs: f64) {
    if let Some(counter) = HTTP_REQUESTS_TOTAL.get() {
        counter.with_label_values(&[method, path, status]).inc();
    }
    if let Some(histogram) = HTTP_REQUEST_DURATION_SECONDS.get() {
        histogram
            .with_label_values(&[method, path])
            .observe(duration_secs);
    }
}

/// Record a processed-layer read.
pub fn record_layer_read(layer: &str, outcome: &str) {
    if let Some(counter) = LAYER_READS_TOTAL.get() {
        counter.with_label_values(&[layer, outcome]).inc();
    }
}

/// Record upstream latency.
pub fn record_upstream_latency(upstream: &str, duration_secs: f64) {
    if let Some(histogram) = UPSTREAM_REQUEST_DURATION_SECONDS.get() {
        histogram
            .with_label_values(&[upstream])
            .observe(duration_secs);
    }
}

/// Record an upstream error.
pub fn record_upstream_error(upstream: &str, error_type: &str) {
    if let Some(counter) = UPSTREAM_ERRORS_TOTAL.get() {
        counter.with_label_values(&[upstream, error_type]).inc();
    }
}

/// Axum middleware recording request counts and latency.
///
/// Routes are labelled by their matched pattern so unknown paths do not
/// create new series.
pub async fn track_http_metrics(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(req).await;

    record_http_request(
        &method,
        &path,
        response.status().as_str(),
        start.elapsed().as_secs_f64(),
    );

    response
}
