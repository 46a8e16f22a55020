// Public API for integration tests and the server binary

pub mod api;
pub mod broadcast;
pub mod config;
pub mod error;
pub mod game;
pub mod protocol;
pub mod state;
pub mod types;
pub mod ws;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// HTTP + WebSocket routes for one session
pub fn router(state: Arc<state::AppState>) -> Router {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .route("/api/round", get(api::get_round))
        .route("/api/roster", get(api::get_roster))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
