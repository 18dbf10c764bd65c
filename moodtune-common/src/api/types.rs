//! API request/response wire types
//!
//! Covers three wire surfaces: the audio resolution service, the
//! expression model service, and the player's own REST API.

use crate::emotion::EmotionLabel;
use crate::events::PlayerState;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ========================================
// Audio resolution service (POST /get_audio_url)
// ========================================

/// Resolution request body
///
/// The payload is exactly the descriptor's search query, nothing else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveRequest {
    pub query: String,
}

/// Resolution response body
///
/// `status` is `"success"` with `audio_url`/`title` set, or any other
/// value with `message` describing the failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveResponse {
    pub status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A concrete playable URL plus title obtained for one descriptor
///
/// Created per resolution call; never cached; superseded by the next
/// resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedMedia {
    pub playable_url: String,
    pub title: String,
}

// ========================================
// Expression model service (POST /detect_expressions)
// ========================================

/// Expression scoring request: one captured frame as base64 image bytes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpressionRequest {
    pub image: String,
}

/// Expression scoring response
///
/// `status` is `"success"` with per-label confidence scores in [0,1],
/// `"no_face"` when no face was found, or any other value with `message`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpressionResponse {
    pub status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expressions: Option<HashMap<String, f32>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// ========================================
// Player REST API
// ========================================

/// Detect request body: one webcam frame as base64 image bytes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectRequest {
    pub image: String,
}

/// Asynchronous playback-start failure reported by the UI audio element
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackErrorReport {
    pub message: String,
}

/// Point-in-time view of the playback session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Session identity; changes when the service restarts
    pub session_id: uuid::Uuid,
    /// Current player state
    pub state: PlayerState,
    /// Current session emotion
    pub emotion: EmotionLabel,
    /// User-visible status message
    pub status_message: String,
    /// Title of the loaded media, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub now_playing: Option<String>,
}
