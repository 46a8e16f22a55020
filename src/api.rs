//! Read-only HTTP endpoints.
//!
//! Nothing here reveals the topic or hint texts; those only travel over
//! the role-aware WebSocket.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

use crate::state::AppState;

/// GET /api/round
pub async fn get_round(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.round_summary().await {
        Some(summary) => Json(summary).into_response(),
        None => (StatusCode::NOT_FOUND, "No round has been started").into_response(),
    }
}

/// GET /api/roster
pub async fn get_roster(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.roster().await)
}
