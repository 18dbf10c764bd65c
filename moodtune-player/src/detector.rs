//! Facial expression detection
//!
//! Wraps the external expression model behind an async port and reduces
//! its per-label confidence scores to the single most-confident emotion.

pub mod http_model;

pub use http_model::HttpExpressionModel;

use async_trait::async_trait;
use moodtune_common::emotion::{EmotionLabel, CANONICAL_ORDER};
use moodtune_common::Result;
use std::collections::HashMap;
use std::sync::Arc;

/// One captured webcam frame, as base64-encoded image bytes
#[derive(Debug, Clone)]
pub struct VideoFrame {
    pub image_base64: String,
}

/// Per-label confidence scores in [0,1]
pub type ExpressionScores = HashMap<EmotionLabel, f32>;

/// External expression model capability
///
/// `Ok(None)` means no face was found; model transport or protocol
/// failures are errors, kept distinct from the no-face outcome.
#[async_trait]
pub trait ExpressionModel: Send + Sync {
    async fn score_frame(&self, frame: &VideoFrame) -> Result<Option<ExpressionScores>>;
}

/// Detection front-end over the expression model
pub struct Detector {
    model: Arc<dyn ExpressionModel>,
}

impl Detector {
    pub fn new(model: Arc<dyn ExpressionModel>) -> Self {
        Self { model }
    }

    /// Most-confident emotion in one frame, or None if no face was found
    pub async fn detect_top_expression(
        &self,
        frame: &VideoFrame,
    ) -> Result<Option<EmotionLabel>> {
        let Some(scores) = self.model.score_frame(frame).await? else {
            return Ok(None);
        };
        Ok(top_expression(&scores))
    }
}

/// Pick the label with the strictly greatest confidence score
///
/// Ties resolve to the first label in canonical order. This is
/// deterministic, not random, so detection stays reproducible.
pub fn top_expression(scores: &ExpressionScores) -> Option<EmotionLabel> {
    let mut best: Option<(EmotionLabel, f32)> = None;
    for label in CANONICAL_ORDER {
        if let Some(&score) = scores.get(&label) {
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((label, score)),
            }
        }
    }
    best.map(|(label, _)| label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_expression_picks_greatest() {
        let scores = ExpressionScores::from([
            (EmotionLabel::Happy, 0.2),
            (EmotionLabel::Sad, 0.7),
            (EmotionLabel::Neutral, 0.1),
        ]);
        assert_eq!(top_expression(&scores), Some(EmotionLabel::Sad));
    }

    #[test]
    fn test_top_expression_tie_breaks_by_canonical_order() {
        // Sad and Surprised tie; Sad comes first in canonical order
        let scores = ExpressionScores::from([
            (EmotionLabel::Surprised, 0.5),
            (EmotionLabel::Sad, 0.5),
            (EmotionLabel::Happy, 0.1),
        ]);
        assert_eq!(top_expression(&scores), Some(EmotionLabel::Sad));

        // Happy precedes everything in canonical order
        let scores = ExpressionScores::from([
            (EmotionLabel::Disgusted, 0.5),
            (EmotionLabel::Happy, 0.5),
        ]);
        assert_eq!(top_expression(&scores), Some(EmotionLabel::Happy));
    }

    #[test]
    fn test_top_expression_empty_scores() {
        assert_eq!(top_expression(&ExpressionScores::new()), None);
    }

    #[tokio::test]
    async fn test_detector_maps_no_face_to_none() {
        struct NoFaceModel;

        #[async_trait]
        impl ExpressionModel for NoFaceModel {
            async fn score_frame(
                &self,
                _frame: &VideoFrame,
            ) -> Result<Option<ExpressionScores>> {
                Ok(None)
            }
        }

        let detector = Detector::new(Arc::new(NoFaceModel));
        let frame = VideoFrame {
            image_base64: String::new(),
        };
        assert_eq!(detector.detect_top_expression(&frame).await.unwrap(), None);
    }
}
