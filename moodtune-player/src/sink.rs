//! Audio output port
//!
//! The player service does not decode or mix audio itself: the browser
//! UI's audio element is the output device. `EventSink` drives it through
//! bus events, and the UI reports asynchronous playback-start failures
//! back through the REST API.

use async_trait::async_trait;
use moodtune_common::api::ResolvedMedia;
use moodtune_common::events::{EventBus, MoodEvent};
use moodtune_common::Result;

/// Abstract audio output
///
/// Synchronous errors from these calls move the state machine to Error;
/// outputs that fail asynchronously report through the failure endpoint.
#[async_trait]
pub trait AudioSink: Send + Sync {
    /// Load new media and begin playback
    async fn load_and_play(&self, media: &ResolvedMedia) -> Result<()>;

    /// Pause the output, keeping the loaded media
    async fn pause(&self) -> Result<()>;

    /// Resume the loaded media without a new resolution
    async fn resume(&self, media: &ResolvedMedia) -> Result<()>;

    /// Stop the output and discard the loaded media
    async fn stop(&self) -> Result<()>;
}

/// Audio output driven through the event bus
///
/// Emitting is lossless from the state machine's perspective: the state
/// write and the matching event happen in the same controller call, so
/// player state and output status cannot diverge across a suspension.
pub struct EventSink {
    events: EventBus,
}

impl EventSink {
    pub fn new(events: EventBus) -> Self {
        Self { events }
    }
}

#[async_trait]
impl AudioSink for EventSink {
    async fn load_and_play(&self, media: &ResolvedMedia) -> Result<()> {
        self.events.emit_lossy(MoodEvent::PlaybackStarted {
            title: media.title.clone(),
            audio_url: media.playable_url.clone(),
            timestamp: chrono::Utc::now(),
        });
        Ok(())
    }

    async fn pause(&self) -> Result<()> {
        self.events.emit_lossy(MoodEvent::PlaybackPaused {
            timestamp: chrono::Utc::now(),
        });
        Ok(())
    }

    async fn resume(&self, media: &ResolvedMedia) -> Result<()> {
        self.events.emit_lossy(MoodEvent::PlaybackResumed {
            title: media.title.clone(),
            timestamp: chrono::Utc::now(),
        });
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        self.events.emit_lossy(MoodEvent::PlaybackStopped {
            timestamp: chrono::Utc::now(),
        });
        Ok(())
    }
}
