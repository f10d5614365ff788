use crate::services::{AirQualityError, DailyQuery};
use crate::startup::AppState;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;

/// Relays EPA AQS daily county data, keeping the upstream status.
pub async fn pollution_data(
    State(state): State<AppState>,
    Query(query): Query<DailyQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (status, body) = state
        .air_quality
        .daily_by_county(&query)
        .await
        .map_err(|e| match e {
            AirQualityError::MissingCredentials => AppError::BadRequest(anyhow::anyhow!(e)),
            other => {
                tracing::error!(error = %other, "EPA AQS proxy failed");
                AppError::BadGateway(other.to_string())
            }
        })?;

    Ok((status, Json(body)))
}
