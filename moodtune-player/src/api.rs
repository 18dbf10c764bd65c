//! REST API for the playback orchestration service

pub mod handlers;
pub mod sse;

use crate::controller::PlaybackController;
use crate::session::PlaybackSession;
use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::json;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Playback controller (the state machine)
    pub controller: Arc<PlaybackController>,
    /// Playback session (read-only from handlers)
    pub session: Arc<PlaybackSession>,
    /// Whether the expression model passed its startup readiness probe
    pub detector_ready: Arc<AtomicBool>,
    /// Server port
    pub port: u16,
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check (no prefix for health endpoint)
        .route("/health", get(health_check))
        // API v1 routes
        .nest(
            "/api/v1",
            Router::new()
                // Detection
                .route("/detect", post(handlers::detect))
                // Playback control
                .route("/playback/play", post(handlers::play))
                .route("/playback/pause", post(handlers::pause))
                .route("/playback/resume", post(handlers::resume))
                .route("/playback/error", post(handlers::playback_error))
                .route("/playback/state", get(handlers::get_state))
                // SSE events
                .route("/events", get(sse::event_stream)),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "module": "moodtune-player",
        "version": env!("CARGO_PKG_VERSION"),
        "port": state.port,
        "session_id": state.session.session_id(),
        "detector_ready": state.detector_ready.load(std::sync::atomic::Ordering::Relaxed),
    }))
}
