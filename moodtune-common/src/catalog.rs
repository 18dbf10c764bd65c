//! Emotion-to-track catalog
//!
//! Static mapping from emotion label to a non-empty list of track
//! descriptors. Lookup is pure and total: alias resolution is applied
//! first, and labels without a curated category fall back to Neutral.

use crate::emotion::EmotionLabel;
use crate::{Error, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

/// A named search query representing one candidate song for an emotion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackDescriptor {
    /// Human-readable song name shown while searching
    pub display_name: String,
    /// Query sent verbatim to the audio resolution service
    pub search_query: String,
}

fn track(display_name: &str, search_query: &str) -> TrackDescriptor {
    TrackDescriptor {
        display_name: display_name.to_string(),
        search_query: search_query.to_string(),
    }
}

/// Built-in curated categories
static BUILTIN: Lazy<HashMap<EmotionLabel, Vec<TrackDescriptor>>> = Lazy::new(|| {
    HashMap::from([
        (
            EmotionLabel::Happy,
            vec![
                track("Ghungroo", "Ghungroo song lyrical"),
                track("Badtameez Dil", "Badtameez Dil Full Song HD"),
                track("Kar Gayi Chull", "Kar Gayi Chull Kapoor & Sons"),
            ],
        ),
        (
            EmotionLabel::Sad,
            vec![
                track("Agar Tum Saath Ho", "Agar Tum Saath Ho lyrical"),
                track("Ve Maahi", "Ve Maahi Kesari Full Song"),
                track("Tujhe Kitna Chahne Lage", "Tujhe Kitna Chahne Lage Kabir Singh"),
            ],
        ),
        (
            EmotionLabel::Angry,
            vec![
                track("Sultan Title Track", "Sultan Title Track Full Song"),
                track("Zinda", "Zinda Bhaag Milkha Bhaag full song"),
                track("Malhari", "Malhari Bajirao Mastani full song"),
            ],
        ),
        (
            EmotionLabel::Neutral,
            vec![
                track("Iktara", "Iktara lyrical Wake Up Sid"),
                track("Kun Faya Kun", "Kun Faya Kun Rockstar full song"),
                track("Shaam", "Shaam Aisha song"),
            ],
        ),
        (
            EmotionLabel::Surprised,
            vec![
                track("Dil Dhadakne Do", "Dil Dhadakne Do Title Track"),
                track(
                    "Sooraj Ki Baahon Mein",
                    "Sooraj Ki Baahon Mein Zindagi Na Milegi Dobara",
                ),
            ],
        ),
    ])
});

/// Mapping from emotion label to curated, non-empty track lists
///
/// Immutable after construction; owned by the process for its lifetime.
#[derive(Debug, Clone)]
pub struct EmotionCatalog {
    categories: HashMap<EmotionLabel, Vec<TrackDescriptor>>,
}

impl EmotionCatalog {
    /// Catalog with the built-in curated categories
    pub fn builtin() -> Self {
        Self {
            categories: BUILTIN.clone(),
        }
    }

    /// Build a catalog from explicit categories
    ///
    /// Validates the totality invariant at construction so `tracks_for`
    /// never fails at runtime: every list must be non-empty and a Neutral
    /// category must exist (it is the fallback for uncurated labels).
    pub fn from_categories(
        categories: HashMap<EmotionLabel, Vec<TrackDescriptor>>,
    ) -> Result<Self> {
        if !categories.contains_key(&EmotionLabel::Neutral) {
            return Err(Error::Config(
                "catalog must define a neutral category (fallback target)".to_string(),
            ));
        }
        for (label, tracks) in &categories {
            if tracks.is_empty() {
                return Err(Error::Config(format!(
                    "catalog category '{}' has no tracks",
                    label
                )));
            }
        }
        Ok(Self { categories })
    }

    /// Parse a catalog from TOML
    ///
    /// Format: one array-of-tables per category, e.g.
    /// ```toml
    /// [[happy]]
    /// display_name = "Ghungroo"
    /// search_query = "Ghungroo song lyrical"
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let raw: HashMap<String, Vec<TrackDescriptor>> = toml::from_str(content)
            .map_err(|e| Error::Config(format!("invalid catalog file: {}", e)))?;

        let mut categories = HashMap::new();
        for (key, tracks) in raw {
            let label = EmotionLabel::from_str(&key)?;
            categories.insert(label, tracks);
        }
        Self::from_categories(categories)
    }

    /// Load a catalog override from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Tracks curated for the given label
    ///
    /// Pure and total: aliases resolve first, then labels without a direct
    /// category fall back to Neutral. Never returns an empty slice.
    pub fn tracks_for(&self, label: EmotionLabel) -> &[TrackDescriptor] {
        let resolved = label.alias_target();
        match self.categories.get(&resolved) {
            Some(tracks) => tracks,
            // from_categories guarantees a neutral category exists
            None => &self.categories[&EmotionLabel::Neutral],
        }
    }
}

impl Default for EmotionCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
