//! Shared API types for moodtune modules

pub mod types;

pub use types::*;
