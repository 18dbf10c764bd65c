//! Common error types for moodtune

use thiserror::Error;

/// Common result type for moodtune operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across moodtune modules
///
/// Operation failures (detection, resolution, playback start) are caught at
/// the controller boundary and converted into a state transition plus a
/// user-visible message; only precondition failures (`Busy`, `InvalidState`)
/// reach API clients as errors.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Expression model failed to initialize (startup-fatal for detection)
    #[error("Model load error: {0}")]
    ModelLoad(String),

    /// Expression model call failed at runtime (distinct from "no face")
    #[error("Detection error: {0}")]
    Detection(String),

    /// Audio resolution service failure, transport error, or malformed body
    #[error("Resolution failed: {0}")]
    Resolution(String),

    /// Audio output rejected the resolved source
    #[error("Playback start failed: {0}")]
    PlaybackStart(String),

    /// A conflicting operation is already in flight
    #[error("Busy: {0}")]
    Busy(String),

    /// Operation not allowed in the current player state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
