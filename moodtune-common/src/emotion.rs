//! Emotion label domain type
//!
//! One discrete detected facial-expression category, with the alias table
//! that collapses rarely-curated categories onto curated ones.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Detected facial-expression category
///
/// The declaration order below is the canonical label order: when multiple
/// labels tie for the maximum confidence score, the first label in this
/// order wins. This keeps detection deterministic and reproducible.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EmotionLabel {
    Happy,
    Sad,
    Angry,
    Neutral,
    Surprised,
    Fearful,
    Disgusted,
}

/// Canonical label order, used for deterministic tie-breaks
pub const CANONICAL_ORDER: [EmotionLabel; 7] = [
    EmotionLabel::Happy,
    EmotionLabel::Sad,
    EmotionLabel::Angry,
    EmotionLabel::Neutral,
    EmotionLabel::Surprised,
    EmotionLabel::Fearful,
    EmotionLabel::Disgusted,
];

impl EmotionLabel {
    /// Category this label is curated under
    ///
    /// Fearful collapses to Neutral and Disgusted to Angry; every other
    /// label maps to itself. Applied before any catalog lookup.
    pub fn alias_target(self) -> EmotionLabel {
        match self {
            EmotionLabel::Fearful => EmotionLabel::Neutral,
            EmotionLabel::Disgusted => EmotionLabel::Angry,
            other => other,
        }
    }

    /// Lowercase label string (matches the serde representation)
    pub fn as_str(self) -> &'static str {
        match self {
            EmotionLabel::Happy => "happy",
            EmotionLabel::Sad => "sad",
            EmotionLabel::Angry => "angry",
            EmotionLabel::Neutral => "neutral",
            EmotionLabel::Surprised => "surprised",
            EmotionLabel::Fearful => "fearful",
            EmotionLabel::Disgusted => "disgusted",
        }
    }
}

impl std::fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EmotionLabel {
    type Err = Error;

    /// Accepts both the long face-model spellings (`surprised`, `fearful`,
    /// `disgusted`) and the short catalog spellings (`surprise`, `fear`,
    /// `disgust`).
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "happy" => Ok(EmotionLabel::Happy),
            "sad" => Ok(EmotionLabel::Sad),
            "angry" => Ok(EmotionLabel::Angry),
            "neutral" => Ok(EmotionLabel::Neutral),
            "surprised" | "surprise" => Ok(EmotionLabel::Surprised),
            "fearful" | "fear" => Ok(EmotionLabel::Fearful),
            "disgusted" | "disgust" => Ok(EmotionLabel::Disgusted),
            other => Err(Error::Config(format!("unknown emotion label: {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_both_spellings() {
        assert_eq!("surprised".parse::<EmotionLabel>().unwrap(), EmotionLabel::Surprised);
        assert_eq!("surprise".parse::<EmotionLabel>().unwrap(), EmotionLabel::Surprised);
        assert_eq!("fear".parse::<EmotionLabel>().unwrap(), EmotionLabel::Fearful);
        assert_eq!("disgust".parse::<EmotionLabel>().unwrap(), EmotionLabel::Disgusted);
        assert_eq!("HAPPY".parse::<EmotionLabel>().unwrap(), EmotionLabel::Happy);
        assert!("bored".parse::<EmotionLabel>().is_err());
    }

    #[test]
    fn test_alias_targets() {
        assert_eq!(EmotionLabel::Fearful.alias_target(), EmotionLabel::Neutral);
        assert_eq!(EmotionLabel::Disgusted.alias_target(), EmotionLabel::Angry);
        for label in [
            EmotionLabel::Happy,
            EmotionLabel::Sad,
            EmotionLabel::Angry,
            EmotionLabel::Neutral,
            EmotionLabel::Surprised,
        ] {
            assert_eq!(label.alias_target(), label);
        }
    }

    #[test]
    fn test_display_matches_serde_representation() {
        for label in CANONICAL_ORDER {
            let json = serde_json::to_string(&label).unwrap();
            assert_eq!(json, format!("\"{}\"", label));
        }
    }

    #[test]
    fn test_canonical_order_covers_all_labels() {
        // Every label appears exactly once
        for label in CANONICAL_ORDER {
            assert_eq!(
                CANONICAL_ORDER.iter().filter(|l| **l == label).count(),
                1
            );
        }
    }
}
