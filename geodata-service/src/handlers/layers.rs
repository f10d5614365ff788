use crate::models::{AreaQuery, AreaSummary, CityQuery};
use crate::services::layers::{JsonObject, EMPTY_COLLECTION};
use crate::services::{AreaLookup, Layer};
use crate::startup::AppState;
use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use service_core::error::AppError;

const GEOJSON_CONTENT_TYPE: &str = "application/geo+json";

async fn serve_layer(
    state: &AppState,
    query: &CityQuery,
    layer: Layer,
) -> Result<Response, AppError> {
    let city = query.city_or(&state.config.data.default_city);
    let body = state
        .layers
        .read_raw(&city, layer)
        .await?
        .unwrap_or_else(|| EMPTY_COLLECTION.to_string());

    Ok(([(header::CONTENT_TYPE, GEOJSON_CONTENT_TYPE)], body).into_response())
}

/// Community areas joined with CCA statistics.
pub async fn cca25(
    State(state): State<AppState>,
    Query(query): Query<CityQuery>,
) -> Result<Response, AppError> {
    serve_layer(&state, &query, Layer::Cca25).await
}

pub async fn food_access(
    State(state): State<AppState>,
    Query(query): Query<CityQuery>,
) -> Result<Response, AppError> {
    serve_layer(&state, &query, Layer::FoodAccess).await
}

/// Distinct community areas, for pickers.
pub async fn area_names(
    State(state): State<AppState>,
    Query(query): Query<CityQuery>,
) -> Result<Json<Vec<AreaSummary>>, AppError> {
    let city = query.city_or(&state.config.data.default_city);
    Ok(Json(state.layers.area_names(&city).await?))
}

/// Properties of one community area.
pub async fn area(
    State(state): State<AppState>,
    Query(query): Query<AreaQuery>,
) -> Result<Json<JsonObject>, AppError> {
    let id = query
        .id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("missing ?id=<CA_ID>")))?;
    let city = query.city().city_or(&state.config.data.default_city);

    match state.layers.area_properties(&city, id).await? {
        AreaLookup::Found(props) => Ok(Json(props)),
        AreaLookup::NotFound => Err(AppError::NotFound(anyhow::anyhow!("not found"))),
        AreaLookup::DatasetMissing => Err(AppError::NotFound(anyhow::anyhow!("dataset missing"))),
    }
}
