//! # moodtune Common Library
//!
//! Shared code for the moodtune modules including:
//! - Emotion domain types (EmotionLabel)
//! - Track catalog (EmotionCatalog)
//! - Event types (MoodEvent enum) and EventBus
//! - API request/response wire types
//! - Configuration loading

pub mod api;
pub mod catalog;
pub mod config;
pub mod emotion;
pub mod error;
pub mod events;

pub use error::{Error, Result};
