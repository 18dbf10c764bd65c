//! Mood-driven playback orchestration service
//!
//! Owns the single playback session and the state machine coordinating
//! detection results, track selection, resolution calls, and the
//! play/pause UI. External collaborators (expression model, audio
//! resolution service, audio output) sit behind async ports.

pub mod api;
pub mod controller;
pub mod detector;
pub mod resolver;
pub mod session;
pub mod sink;
