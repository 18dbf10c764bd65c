//! Shared playback session state
//!
//! Exactly one `PlaybackSession` exists for the life of the process. It is
//! mutated only by the `PlaybackController` in response to detection
//! results, resolution results, and user commands; everything else reads
//! snapshots or subscribes to the event stream.

use moodtune_common::api::{ResolvedMedia, SessionSnapshot};
use moodtune_common::emotion::EmotionLabel;
use moodtune_common::events::{EventBus, MoodEvent};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

// Re-export for callers that only need the state enum
pub use moodtune_common::events::PlayerState;

/// The live, mutable state of the player
///
/// Uses RwLock fields for concurrent read access with rare writes. The
/// request token is the supersession guard: logical requests (not threads)
/// can outlive their relevance, so every suspension point re-checks it
/// before mutating the session.
pub struct PlaybackSession {
    /// Identity of this session (fresh per process start)
    session_id: Uuid,

    /// Current player state
    player_state: RwLock<PlayerState>,

    /// Emotion from the last successful detection
    current_emotion: RwLock<EmotionLabel>,

    /// Media loaded into the audio output (None if nothing loaded)
    current_media: RwLock<Option<ResolvedMedia>>,

    /// User-visible status message
    status_message: RwLock<String>,

    /// Monotonically incremented token identifying the newest request
    request_token: AtomicU64,

    /// Event broadcaster for SSE clients
    events: EventBus,
}

impl PlaybackSession {
    /// Create a new session in the Idle state
    pub fn new(events: EventBus) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            player_state: RwLock::new(PlayerState::Idle),
            current_emotion: RwLock::new(EmotionLabel::Neutral),
            current_media: RwLock::new(None),
            status_message: RwLock::new(String::new()),
            request_token: AtomicU64::new(0),
            events,
        }
    }

    /// Session identity
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Event bus shared with SSE clients and the audio sink
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Subscribe to the event stream
    pub fn subscribe_events(&self) -> broadcast::Receiver<MoodEvent> {
        self.events.subscribe()
    }

    /// Get current player state
    pub async fn player_state(&self) -> PlayerState {
        *self.player_state.read().await
    }

    /// Set player state, broadcasting the transition
    pub async fn set_player_state(&self, new_state: PlayerState) {
        let old_state = {
            let mut guard = self.player_state.write().await;
            std::mem::replace(&mut *guard, new_state)
        };
        if old_state != new_state {
            self.events.emit_lossy(MoodEvent::PlayerStateChanged {
                old_state,
                new_state,
                timestamp: chrono::Utc::now(),
            });
        }
    }

    /// Get the session emotion
    pub async fn current_emotion(&self) -> EmotionLabel {
        *self.current_emotion.read().await
    }

    /// Set the session emotion (successful detections only)
    pub async fn set_current_emotion(&self, emotion: EmotionLabel) {
        *self.current_emotion.write().await = emotion;
    }

    /// Get the loaded media
    pub async fn current_media(&self) -> Option<ResolvedMedia> {
        self.current_media.read().await.clone()
    }

    /// Set or discard the loaded media
    pub async fn set_current_media(&self, media: Option<ResolvedMedia>) {
        *self.current_media.write().await = media;
    }

    /// Get the status message
    pub async fn status_message(&self) -> String {
        self.status_message.read().await.clone()
    }

    /// Set the status message, broadcasting the change
    pub async fn set_status_message(&self, message: &str) {
        *self.status_message.write().await = message.to_string();
        self.events.emit_lossy(MoodEvent::StatusChanged {
            message: message.to_string(),
            timestamp: chrono::Utc::now(),
        });
    }

    /// Issue a fresh request token, superseding all in-flight requests
    pub fn next_request_token(&self) -> u64 {
        self.request_token.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// The newest issued token
    pub fn current_request_token(&self) -> u64 {
        self.request_token.load(Ordering::SeqCst)
    }

    /// Whether a captured token still identifies the newest request
    pub fn is_current(&self, token: u64) -> bool {
        self.current_request_token() == token
    }

    /// Point-in-time snapshot for API responses
    pub async fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.session_id,
            state: self.player_state().await,
            emotion: self.current_emotion().await,
            status_message: self.status_message().await,
            now_playing: self.current_media().await.map(|m| m.title),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> PlaybackSession {
        PlaybackSession::new(EventBus::new(16))
    }

    #[tokio::test]
    async fn test_initial_state() {
        let s = session();
        assert_eq!(s.player_state().await, PlayerState::Idle);
        assert_eq!(s.current_emotion().await, EmotionLabel::Neutral);
        assert!(s.current_media().await.is_none());
        assert_eq!(s.status_message().await, "");
    }

    #[tokio::test]
    async fn test_state_transition_emits_event() {
        let s = session();
        let mut rx = s.subscribe_events();

        s.set_player_state(PlayerState::Detecting).await;
        match rx.try_recv().unwrap() {
            MoodEvent::PlayerStateChanged {
                old_state,
                new_state,
                ..
            } => {
                assert_eq!(old_state, PlayerState::Idle);
                assert_eq!(new_state, PlayerState::Detecting);
            }
            other => panic!("unexpected event: {:?}", other),
        }

        // Setting the same state again is not a transition
        s.set_player_state(PlayerState::Detecting).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_request_tokens_are_monotonic() {
        let s = session();
        let first = s.next_request_token();
        let second = s.next_request_token();
        assert!(second > first);
        assert!(s.is_current(second));
        assert!(!s.is_current(first));
    }

    #[tokio::test]
    async fn test_snapshot_reflects_media() {
        let s = session();
        s.set_current_media(Some(ResolvedMedia {
            playable_url: "http://x/a.mp3".to_string(),
            title: "Song A".to_string(),
        }))
        .await;

        let snapshot = s.snapshot().await;
        assert_eq!(snapshot.now_playing.as_deref(), Some("Song A"));
        assert_eq!(snapshot.session_id, s.session_id());
    }
}
