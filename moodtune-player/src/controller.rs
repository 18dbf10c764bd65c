//! Playback controller - the orchestration state machine
//!
//! Coordinates detection results, track selection, resolution calls, and
//! the play/pause UI. All session mutations happen here, and only after a
//! suspension point when the captured request token still matches the
//! session's newest token: stale results are discarded, never applied.

use crate::detector::{Detector, VideoFrame};
use crate::resolver::TrackResolver;
use crate::session::{PlaybackSession, PlayerState};
use crate::sink::AudioSink;
use moodtune_common::catalog::{EmotionCatalog, TrackDescriptor};
use moodtune_common::events::MoodEvent;
use moodtune_common::{Error, Result};
use rand::rngs::StdRng;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

const MSG_NO_FACE: &str = "No face found. Try again.";
const MSG_RESOLVE_FAILED: &str = "Could not find a playable source. Try another song.";
const MSG_PLAYBACK_ERROR: &str = "Playback error. Click play again.";

/// Finite-state machine driving the playback session
///
/// UI controls are pure triggers of these methods; UI rendering is a pure
/// function of the session snapshot and event stream.
pub struct PlaybackController {
    session: Arc<PlaybackSession>,
    catalog: EmotionCatalog,
    detector: Detector,
    resolver: Arc<dyn TrackResolver>,
    sink: Arc<dyn AudioSink>,
    /// Injected so track selection is seedable in tests
    rng: Mutex<StdRng>,
    /// Set for the whole duration of a detect call, including the sink
    /// stop that precedes the Detecting state write
    detect_in_flight: AtomicBool,
}

/// Clears the in-flight flag on every exit path, early returns included
struct DetectGuard<'a>(&'a AtomicBool);

impl Drop for DetectGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl PlaybackController {
    pub fn new(
        session: Arc<PlaybackSession>,
        catalog: EmotionCatalog,
        detector: Detector,
        resolver: Arc<dyn TrackResolver>,
        sink: Arc<dyn AudioSink>,
        rng: StdRng,
    ) -> Self {
        Self {
            session,
            catalog,
            detector,
            resolver,
            sink,
            rng: Mutex::new(rng),
            detect_in_flight: AtomicBool::new(false),
        }
    }

    /// Run one detection pass and update the session emotion
    ///
    /// Allowed from every state except Detecting (re-entrancy guard; UI
    /// button disabling is a nicety, not the correctness mechanism). A new
    /// detection always invalidates the current song context: playback is
    /// stopped, loaded media discarded, and in-flight resolutions
    /// superseded via the token bump.
    pub async fn detect(&self, frame: VideoFrame) -> Result<()> {
        // Atomic check-and-set: a state read here would race against the
        // awaits below, letting two concurrent calls both pass the guard.
        if self
            .detect_in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(Error::Busy("detection already in progress".to_string()));
        }
        let _guard = DetectGuard(&self.detect_in_flight);

        let state = self.session.player_state().await;
        let token = self.session.next_request_token();

        if matches!(
            state,
            PlayerState::Playing | PlayerState::Paused | PlayerState::Resolving
        ) {
            self.sink.stop().await?;
            self.session.set_current_media(None).await;
        }

        self.session.set_player_state(PlayerState::Detecting).await;
        self.session.set_status_message("Scanning...").await;

        match self.detector.detect_top_expression(&frame).await {
            Ok(Some(emotion)) => {
                if !self.session.is_current(token) {
                    debug!("discarding superseded detection result: {}", emotion);
                    return Ok(());
                }
                self.session.set_current_emotion(emotion).await;
                self.session.set_player_state(PlayerState::Ready).await;
                self.session
                    .set_status_message(&format!("Detected mood: {}", emotion))
                    .await;
                self.session.events().emit_lossy(MoodEvent::EmotionDetected {
                    emotion,
                    timestamp: chrono::Utc::now(),
                });
                info!("detected emotion: {}", emotion);
            }
            Ok(None) => {
                if !self.session.is_current(token) {
                    return Ok(());
                }
                // No face found: recoverable, emotion untouched
                self.session.set_player_state(PlayerState::Idle).await;
                self.session.set_status_message(MSG_NO_FACE).await;
                self.session.events().emit_lossy(MoodEvent::NoFaceFound {
                    timestamp: chrono::Utc::now(),
                });
            }
            Err(e) => {
                warn!("detection failed: {}", e);
                if !self.session.is_current(token) {
                    return Ok(());
                }
                self.session.set_player_state(PlayerState::Idle).await;
                self.session
                    .set_status_message(&format!("Detection failed: {}", e))
                    .await;
            }
        }

        Ok(())
    }

    /// Request playback of a random track for the session emotion
    ///
    /// From Playing or Paused this means "fetch a different song", never
    /// "resume". Re-entry from Resolving is the rapid-double-click case:
    /// the fresh token supersedes the in-flight resolution, whose result
    /// is discarded on arrival. Re-entry from Error is the user retry.
    pub async fn request_playback(&self) -> Result<()> {
        let state = self.session.player_state().await;
        match state {
            PlayerState::Ready
            | PlayerState::Resolving
            | PlayerState::Playing
            | PlayerState::Paused
            | PlayerState::Error => {}
            PlayerState::Idle => {
                return Err(Error::InvalidState("no mood detected yet".to_string()));
            }
            PlayerState::Detecting => {
                return Err(Error::Busy("detection in progress".to_string()));
            }
        }

        let token = self.session.next_request_token();

        if state == PlayerState::Playing {
            self.sink.pause().await?;
        }

        let emotion = self.session.current_emotion().await;
        let track = self.pick_track(emotion);

        self.session.set_player_state(PlayerState::Resolving).await;
        self.session
            .set_status_message(&format!("Searching for: {}", track.display_name))
            .await;
        self.session.events().emit_lossy(MoodEvent::TrackSelected {
            display_name: track.display_name.clone(),
            emotion,
            timestamp: chrono::Utc::now(),
        });

        match self.resolver.resolve(&track).await {
            Ok(media) => {
                if !self.session.is_current(token) {
                    debug!("discarding superseded resolution: {}", media.title);
                    return Ok(());
                }
                let started = self.sink.load_and_play(&media).await;
                // The sink call is a suspension point too: a newer request
                // may have completed while it was pending.
                if !self.session.is_current(token) {
                    debug!("discarding superseded playback start: {}", media.title);
                    return Ok(());
                }
                match started {
                    Ok(()) => {
                        self.session.set_current_media(Some(media.clone())).await;
                        self.session.set_player_state(PlayerState::Playing).await;
                        self.session
                            .set_status_message(&format!("Now Playing: {}", media.title))
                            .await;
                        info!("playing '{}' for emotion {}", media.title, emotion);
                    }
                    Err(e) => {
                        warn!("playback start failed: {}", e);
                        self.session.set_player_state(PlayerState::Error).await;
                        self.session.set_status_message(MSG_PLAYBACK_ERROR).await;
                        self.session.events().emit_lossy(MoodEvent::PlaybackFailed {
                            reason: e.to_string(),
                            timestamp: chrono::Utc::now(),
                        });
                    }
                }
            }
            Err(e) => {
                if !self.session.is_current(token) {
                    debug!("discarding superseded resolution failure: {}", e);
                    return Ok(());
                }
                warn!("resolution failed for '{}': {}", track.search_query, e);
                // No media swapped in; whatever was loaded stays loaded
                self.session.set_player_state(PlayerState::Error).await;
                self.session.set_status_message(MSG_RESOLVE_FAILED).await;
                self.session.events().emit_lossy(MoodEvent::ResolutionFailed {
                    reason: e.to_string(),
                    timestamp: chrono::Utc::now(),
                });
            }
        }

        Ok(())
    }

    /// Pause playback, preserving the loaded media for resume
    pub async fn pause(&self) -> Result<()> {
        let state = self.session.player_state().await;
        if state != PlayerState::Playing {
            return Err(Error::InvalidState(format!("cannot pause while {}", state)));
        }

        self.sink.pause().await?;
        self.session.set_player_state(PlayerState::Paused).await;
        self.session.set_status_message("Paused").await;
        Ok(())
    }

    /// Resume the loaded media without a new resolution call
    pub async fn resume(&self) -> Result<()> {
        let state = self.session.player_state().await;
        if state != PlayerState::Paused {
            return Err(Error::InvalidState(format!("cannot resume while {}", state)));
        }
        let media = self
            .session
            .current_media()
            .await
            .ok_or_else(|| Error::InvalidState("no media loaded".to_string()))?;

        match self.sink.resume(&media).await {
            Ok(()) => {
                self.session.set_player_state(PlayerState::Playing).await;
                self.session
                    .set_status_message(&format!("Now Playing: {}", media.title))
                    .await;
                Ok(())
            }
            Err(e) => {
                warn!("resume failed: {}", e);
                self.session.set_player_state(PlayerState::Error).await;
                self.session.set_status_message(MSG_PLAYBACK_ERROR).await;
                self.session.events().emit_lossy(MoodEvent::PlaybackFailed {
                    reason: e.to_string(),
                    timestamp: chrono::Utc::now(),
                });
                Ok(())
            }
        }
    }

    /// Handle an asynchronous playback-start failure from the output
    ///
    /// The browser audio element can reject a source after load_and_play
    /// already returned; the UI reports that here. Only valid while
    /// Playing: a late or duplicate report arriving after the user has
    /// already moved on (new detect, new resolution) is rejected instead
    /// of clobbering the in-progress state. Recoverable: the user retries
    /// via request_playback.
    pub async fn report_playback_failure(&self, reason: &str) -> Result<()> {
        let state = self.session.player_state().await;
        if state != PlayerState::Playing {
            return Err(Error::InvalidState(format!(
                "no playback to fail while {}",
                state
            )));
        }
        warn!("output reported playback failure: {}", reason);
        self.session.set_player_state(PlayerState::Error).await;
        self.session.set_status_message(MSG_PLAYBACK_ERROR).await;
        self.session.events().emit_lossy(MoodEvent::PlaybackFailed {
            reason: reason.to_string(),
            timestamp: chrono::Utc::now(),
        });
        Ok(())
    }

    /// Uniformly random pick from the emotion's category
    ///
    /// Independent of previous selections; repeats are allowed.
    fn pick_track(&self, emotion: moodtune_common::emotion::EmotionLabel) -> TrackDescriptor {
        let tracks = self.catalog.tracks_for(emotion);
        // tracks_for never returns an empty slice
        let index = self
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .gen_range(0..tracks.len());
        tracks[index].clone()
    }
}
