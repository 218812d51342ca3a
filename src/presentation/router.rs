// HTTP routes
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    active_form, clear_form, get_tile, get_tile_form, health_check, hover_legend, list_tiles,
    refresh_table_fields, refresh_tile, set_global_period, set_hidden_labels, set_tile_period,
    stream_dashboard, submit_tile_form,
};
use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/tiles", get(list_tiles))
        .route("/tiles/:id", get(get_tile))
        .route("/tiles/:id/refresh", post(refresh_tile))
        .route("/tiles/:id/form", get(get_tile_form).put(submit_tile_form))
        .route("/tiles/:id/legend/hidden", put(set_hidden_labels))
        .route("/tiles/:id/legend/hover", post(hover_legend))
        .route("/tiles/:id/period", put(set_tile_period))
        .route("/forms/active", get(active_form))
        .route("/forms/clear", post(clear_form))
        .route("/dashboard/period", put(set_global_period))
        .route("/dashboard/stream", get(stream_dashboard))
        .route("/tables/:table/fields/refresh", post(refresh_table_fields))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
