//! Track resolution client
//!
//! Turns a track descriptor into a playable URL via the external audio
//! resolution service. No retries here; retry policy belongs to the
//! caller, and the resolver never touches playback state.

use async_trait::async_trait;
use moodtune_common::api::{ResolveRequest, ResolveResponse, ResolvedMedia};
use moodtune_common::catalog::TrackDescriptor;
use moodtune_common::{Error, Result};
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("moodtune/", env!("CARGO_PKG_VERSION"));

/// External audio resolution capability
#[async_trait]
pub trait TrackResolver: Send + Sync {
    /// Resolve a descriptor into playable media, or fail with a reason
    async fn resolve(&self, descriptor: &TrackDescriptor) -> Result<ResolvedMedia>;
}

/// Resolution service client (POST /get_audio_url)
///
/// Any non-"success" status, transport failure, or malformed body is a
/// resolution failure; the caller does not distinguish between them.
pub struct HttpTrackResolver {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpTrackResolver {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Internal(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl TrackResolver for HttpTrackResolver {
    async fn resolve(&self, descriptor: &TrackDescriptor) -> Result<ResolvedMedia> {
        let url = format!("{}/get_audio_url", self.base_url);
        debug!("resolving '{}' via {}", descriptor.search_query, url);

        let response = self
            .http_client
            .post(&url)
            .json(&ResolveRequest {
                query: descriptor.search_query.clone(),
            })
            .send()
            .await
            .map_err(|e| Error::Resolution(format!("network error: {}", e)))?;

        // The service reports failures in the JSON body (with a non-2xx
        // code); decode the body either way.
        let body: ResolveResponse = response
            .json()
            .await
            .map_err(|e| Error::Resolution(format!("malformed response: {}", e)))?;

        if body.status != "success" {
            return Err(Error::Resolution(
                body.message
                    .unwrap_or_else(|| format!("service status '{}'", body.status)),
            ));
        }

        let playable_url = body
            .audio_url
            .ok_or_else(|| Error::Resolution("response missing audio_url".to_string()))?;

        Ok(ResolvedMedia {
            playable_url,
            title: body.title.unwrap_or_else(|| "Audio".to_string()),
        })
    }
}
