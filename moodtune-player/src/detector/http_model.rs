//! HTTP expression model client
//!
//! Talks to the expression model sidecar: `GET /health` as the readiness
//! probe at startup, `POST /detect_expressions` per frame.

use crate::detector::{ExpressionModel, ExpressionScores, VideoFrame};
use async_trait::async_trait;
use moodtune_common::api::{ExpressionRequest, ExpressionResponse};
use moodtune_common::emotion::EmotionLabel;
use moodtune_common::{Error, Result};
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("moodtune/", env!("CARGO_PKG_VERSION"));

/// Expression model served over HTTP
pub struct HttpExpressionModel {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpExpressionModel {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::ModelLoad(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Startup readiness probe
    ///
    /// A failed probe is reported at startup and disables the Detect
    /// control; it does not kill the service.
    pub async fn probe_ready(&self) -> Result<()> {
        let url = format!("{}/health", self.base_url);
        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::ModelLoad(format!("model unreachable: {}", e)))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Error::ModelLoad(format!(
                "model health check returned HTTP {}",
                response.status()
            )))
        }
    }
}

#[async_trait]
impl ExpressionModel for HttpExpressionModel {
    async fn score_frame(&self, frame: &VideoFrame) -> Result<Option<ExpressionScores>> {
        let url = format!("{}/detect_expressions", self.base_url);
        let response = self
            .http_client
            .post(&url)
            .json(&ExpressionRequest {
                image: frame.image_base64.clone(),
            })
            .send()
            .await
            .map_err(|e| Error::Detection(format!("network error: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Detection(format!(
                "model returned HTTP {}",
                response.status()
            )));
        }

        let body: ExpressionResponse = response
            .json()
            .await
            .map_err(|e| Error::Detection(format!("malformed model response: {}", e)))?;

        match body.status.as_str() {
            "success" => {
                let mut scores = ExpressionScores::new();
                for (key, score) in body.expressions.unwrap_or_default() {
                    match key.parse::<EmotionLabel>() {
                        Ok(label) => {
                            scores.insert(label, score);
                        }
                        Err(_) => debug!("ignoring unknown expression label: {}", key),
                    }
                }
                Ok(Some(scores))
            }
            "no_face" => Ok(None),
            other => Err(Error::Detection(format!(
                "model returned status '{}': {}",
                other,
                body.message.unwrap_or_default()
            ))),
        }
    }
}
