//! Event types for the moodtune event system
//!
//! Provides the shared event definitions and EventBus used by the player
//! service and its SSE clients. The UI renders purely from this stream:
//! every controller transition is observable here.

use crate::emotion::EmotionLabel;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Player state enumeration
///
/// Error is terminal per attempt but recoverable: a new detect or playback
/// request re-enters the machine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlayerState {
    /// No media loaded, no emotion known
    Idle,
    /// A detection call is in flight
    Detecting,
    /// Emotion known, no media loaded
    Ready,
    /// A track-resolution call is in flight
    Resolving,
    /// Media loaded and playing
    Playing,
    /// Media loaded, output paused
    Paused,
    /// Last attempt failed; user may retry
    Error,
}

impl std::fmt::Display for PlayerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerState::Idle => write!(f, "idle"),
            PlayerState::Detecting => write!(f, "detecting"),
            PlayerState::Ready => write!(f, "ready"),
            PlayerState::Resolving => write!(f, "resolving"),
            PlayerState::Playing => write!(f, "playing"),
            PlayerState::Paused => write!(f, "paused"),
            PlayerState::Error => write!(f, "error"),
        }
    }
}

/// moodtune event types
///
/// Events are broadcast via EventBus and serialized for SSE transmission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MoodEvent {
    /// Player state machine transitioned
    PlayerStateChanged {
        /// State before the transition
        old_state: PlayerState,
        /// State after the transition
        new_state: PlayerState,
        /// When the transition happened
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// User-visible status message changed
    StatusChanged {
        /// New status message ("" clears the display)
        message: String,
        /// When the message changed
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Detection succeeded and the session emotion was updated
    EmotionDetected {
        /// Most-confident emotion label
        emotion: EmotionLabel,
        /// When detection completed
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Detection found no face; session emotion is untouched
    NoFaceFound {
        /// When detection completed
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A track was picked for resolution
    TrackSelected {
        /// Display name of the selected track
        display_name: String,
        /// Emotion category the track was picked from
        emotion: EmotionLabel,
        /// When the track was selected
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Resolution failed; no media was swapped in
    ResolutionFailed {
        /// Failure reason from the resolution service or transport
        reason: String,
        /// When resolution failed
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// New media loaded into the audio output and playback started
    ///
    /// The UI sets its audio element source to `audio_url` and plays.
    PlaybackStarted {
        /// Resolved track title
        title: String,
        /// Playable audio URL
        audio_url: String,
        /// When playback started
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Output paused; media preserved for resume
    PlaybackPaused {
        /// When playback paused
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Output resumed with the same media, no new resolution
    PlaybackResumed {
        /// Title of the resumed track
        title: String,
        /// When playback resumed
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Output stopped and media discarded (new detection under way)
    PlaybackStopped {
        /// When playback stopped
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Playback start failed asynchronously in the output
    PlaybackFailed {
        /// Failure reason reported by the output
        reason: String,
        /// When the failure was reported
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl MoodEvent {
    /// Get event type as string for SSE event names and filtering
    pub fn event_type(&self) -> &'static str {
        match self {
            MoodEvent::PlayerStateChanged { .. } => "PlayerStateChanged",
            MoodEvent::StatusChanged { .. } => "StatusChanged",
            MoodEvent::EmotionDetected { .. } => "EmotionDetected",
            MoodEvent::NoFaceFound { .. } => "NoFaceFound",
            MoodEvent::TrackSelected { .. } => "TrackSelected",
            MoodEvent::ResolutionFailed { .. } => "ResolutionFailed",
            MoodEvent::PlaybackStarted { .. } => "PlaybackStarted",
            MoodEvent::PlaybackPaused { .. } => "PlaybackPaused",
            MoodEvent::PlaybackResumed { .. } => "PlaybackResumed",
            MoodEvent::PlaybackStopped { .. } => "PlaybackStopped",
            MoodEvent::PlaybackFailed { .. } => "PlaybackFailed",
        }
    }
}

/// Central event distribution bus
///
/// Wraps tokio::broadcast: non-blocking publish, multiple concurrent
/// subscribers, automatic cleanup when subscribers drop.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<MoodEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus buffering up to `capacity` events
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<MoodEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Err` if no subscribers are listening.
    pub fn emit(
        &self,
        event: MoodEvent,
    ) -> std::result::Result<usize, broadcast::error::SendError<MoodEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: MoodEvent) {
        let _ = self.tx.send(event);
    }

    /// Current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
