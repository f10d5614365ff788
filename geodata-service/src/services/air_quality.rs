//! EPA Air Quality System (AQS) passthrough client.

use crate::config::EpaConfig;
use crate::services::metrics;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::{Duration, Instant};
use thiserror::Error;

const UPSTREAM: &str = "epa";

#[derive(Error, Debug)]
pub enum AirQualityError {
    #[error("Set EPA_API_EMAIL and EPA_API_KEY in .env")]
    MissingCredentials,

    #[error("EPA AQS request failed: {0}")]
    Network(String),

    #[error("EPA AQS returned a non-JSON body (status {status}): {message}")]
    InvalidBody { status: StatusCode, message: String },
}

/// Per-request overrides of the configured query.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DailyQuery {
    pub param: Option<String>,
    pub bdate: Option<String>,
    pub edate: Option<String>,
}

#[derive(Clone)]
pub struct AirQualityClient {
    client: Client,
    config: EpaConfig,
}

impl AirQualityClient {
    pub fn new(config: EpaConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self { client, config })
    }

    /// Daily county summaries. The upstream body and status are returned
    /// as-is so callers can relay them.
    pub async fn daily_by_county(
        &self,
        query: &DailyQuery,
    ) -> Result<(StatusCode, Value), AirQualityError> {
        let (email, key) = self
            .config
            .credentials()
            .ok_or(AirQualityError::MissingCredentials)?;

        let url = format!(
            "{}/dailyData/byCounty",
            self.config.base_url.trim_end_matches('/')
        );
        let params = [
            ("email", email),
            ("key", key),
            ("param", query.param.as_deref().unwrap_or(self.config.param.as_str())),
            ("bdate", query.bdate.as_deref().unwrap_or(self.config.bdate.as_str())),
            ("edate", query.edate.as_deref().unwrap_or(self.config.edate.as_str())),
            ("state", self.config.state.as_str()),
            ("county", self.config.county.as_str()),
        ];

        let start = Instant::now();
        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                metrics::record_upstream_error(UPSTREAM, "network_error");
                AirQualityError::Network(e.to_string())
            })?;
        let status = response.status();

        let body = response.json::<Value>().await.map_err(|e| {
            metrics::record_upstream_error(UPSTREAM, "invalid_body");
            AirQualityError::InvalidBody {
                status,
                message: e.to_string(),
            }
        })?;
        metrics::record_upstream_latency(UPSTREAM, start.elapsed().as_secs_f64());

        if !status.is_success() {
            tracing::warn!(status = %status, "EPA AQS returned an error status");
        }

        Ok((status, body))
    }
}
