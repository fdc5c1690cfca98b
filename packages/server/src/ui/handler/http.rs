//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{infrastructure::dto::http::HubStatusDto, ui::state::AppState};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Current connection, group and history counts
pub async fn hub_status(State(state): State<Arc<AppState>>) -> Json<HubStatusDto> {
    let stats = state.get_hub_status_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(stats.into())
}
