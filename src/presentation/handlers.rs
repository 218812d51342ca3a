// HTTP request handlers
use crate::application::bar_tile_service::{RefreshOutcome, TileError};
use crate::domain::filter::PeriodSelection;
use crate::domain::form::BarChartForm;
use crate::infrastructure::chunked_json::stream_from_receiver;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct HoverRequest {
    pub label: String,
    /// true on mouse-enter, false on mouse-leave
    pub active: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalPeriodRequest {
    pub global_filters: bool,
    #[serde(default)]
    pub period: PeriodSelection,
}

impl IntoResponse for TileError {
    fn into_response(self) -> Response {
        let status = match &self {
            TileError::NotFound(_) => StatusCode::NOT_FOUND,
            TileError::Analytics(_) => StatusCode::BAD_GATEWAY,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

async fn respond<T: Serialize>(data: &T, headers: &HeaderMap) -> Response {
    match json_response(data, accepts_brotli(headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn list_tiles(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let tiles = state.tile_service.tiles().await;
    respond(&tiles, &headers).await
}

pub async fn get_tile(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, TileError> {
    let tile = state.tile_service.tile(&id).await?;
    Ok(respond(&tile, &headers).await)
}

/// Query the backend for a tile and return its chart
pub async fn refresh_tile(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, TileError> {
    match state.tile_service.refresh(&id).await? {
        RefreshOutcome::Rendered(plot) | RefreshOutcome::Unchanged(Some(plot)) => {
            Ok(respond(&plot, &headers).await)
        }
        RefreshOutcome::Unchanged(None) => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

pub async fn get_tile_form(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<BarChartForm>, TileError> {
    Ok(Json(state.tile_service.form(&id).await?))
}

pub async fn submit_tile_form(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(form): Json<BarChartForm>,
) -> Result<Response, TileError> {
    let values = state.tile_service.submit_form(&id, form).await?;
    let status = if values.valid {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };
    Ok((status, Json(values)).into_response())
}

pub async fn active_form(State(state): State<Arc<AppState>>) -> Json<BarChartForm> {
    Json(state.tile_service.active_form().await)
}

pub async fn clear_form(State(state): State<Arc<AppState>>) -> Json<BarChartForm> {
    Json(state.tile_service.clear_form().await)
}

pub async fn set_hidden_labels(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(labels): Json<Vec<String>>,
) -> Result<Response, TileError> {
    let tile_context = state.tile_service.set_hidden(&id, labels).await?;
    Ok(Json(tile_context).into_response())
}

pub async fn hover_legend(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(hover): Json<HoverRequest>,
) -> Result<Response, TileError> {
    match state
        .tile_service
        .hover_legend(&id, &hover.label, hover.active)
        .await?
    {
        Some(plot) => Ok(Json(plot).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

pub async fn set_global_period(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GlobalPeriodRequest>,
) -> StatusCode {
    state
        .tile_service
        .set_global_period(request.global_filters, request.period)
        .await;
    StatusCode::NO_CONTENT
}

pub async fn set_tile_period(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(selection): Json<PeriodSelection>,
) -> Result<StatusCode, TileError> {
    state.tile_service.set_tile_period(&id, selection).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn refresh_table_fields(
    Path(table): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, TileError> {
    let fields = state.tile_service.refresh_fields(&table).await?;
    Ok(Json(fields).into_response())
}

/// Refresh every tile, streaming results as they arrive
pub async fn stream_dashboard(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let rx = state.streaming_service.stream_dashboard().await;
    stream_from_receiver(rx, accepts_brotli(&headers)).await
}
