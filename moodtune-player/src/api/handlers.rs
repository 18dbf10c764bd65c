//! API request handlers
//!
//! Handlers only see precondition failures: operation failures (no face,
//! resolution errors, playback-start errors) are already converted into
//! state transitions by the controller, so those requests return the
//! updated session snapshot.

use crate::api::AppState;
use crate::detector::VideoFrame;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use moodtune_common::api::{DetectRequest, PlaybackErrorReport};
use moodtune_common::Error;
use serde_json::json;
use std::sync::atomic::Ordering;

/// Map a controller error onto an HTTP response
fn error_response(error: Error) -> Response {
    let status = match error {
        Error::Busy(_) | Error::InvalidState(_) => StatusCode::CONFLICT,
        Error::ModelLoad(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": error.to_string() }))).into_response()
}

/// POST /api/v1/detect - run one detection pass on a frame
pub async fn detect(
    State(state): State<AppState>,
    Json(request): Json<DetectRequest>,
) -> Response {
    if !state.detector_ready.load(Ordering::Relaxed) {
        return error_response(Error::ModelLoad(
            "expression model unavailable".to_string(),
        ));
    }

    let frame = VideoFrame {
        image_base64: request.image,
    };
    match state.controller.detect(frame).await {
        Ok(()) => Json(state.session.snapshot().await).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /api/v1/playback/play - request playback / play another song
pub async fn play(State(state): State<AppState>) -> Response {
    match state.controller.request_playback().await {
        Ok(()) => Json(state.session.snapshot().await).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /api/v1/playback/pause
pub async fn pause(State(state): State<AppState>) -> Response {
    match state.controller.pause().await {
        Ok(()) => Json(state.session.snapshot().await).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /api/v1/playback/resume
pub async fn resume(State(state): State<AppState>) -> Response {
    match state.controller.resume().await {
        Ok(()) => Json(state.session.snapshot().await).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /api/v1/playback/error - UI reports an async playback-start failure
pub async fn playback_error(
    State(state): State<AppState>,
    Json(report): Json<PlaybackErrorReport>,
) -> Response {
    match state.controller.report_playback_failure(&report.message).await {
        Ok(()) => Json(state.session.snapshot().await).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /api/v1/playback/state - session snapshot
pub async fn get_state(State(state): State<AppState>) -> Response {
    Json(state.session.snapshot().await).into_response()
}
