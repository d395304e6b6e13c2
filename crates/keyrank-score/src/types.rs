//! Scoring types.

use keyrank_core::FeatureMap;
use serde::{Deserialize, Serialize};

/// Weights of the composite score.
///
/// `score = (semantic·density + statistical·(pos·pos + position·loc + tfidf·tfidf)) · (1 + position_boost·loc)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Weight of semantic density.
    pub semantic: f64,
    /// Weight of the combined statistical features.
    pub statistical: f64,
    pub pos: f64,
    pub position: f64,
    pub tfidf: f64,
    /// Multiplicative boost for well-placed words.
    pub position_boost: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            semantic: 0.4,
            statistical: 0.6,
            pos: 0.3,
            position: 0.8,
            tfidf: 1.2,
            position_boost: 0.2,
        }
    }
}

/// The four normalized features the scorer fuses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Features {
    pub density: FeatureMap,
    pub tfidf: FeatureMap,
    pub position: FeatureMap,
    pub pos: FeatureMap,
}

/// A word with its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredWord {
    pub word: String,
    pub score: f64,
}

impl ScoredWord {
    pub fn new(word: impl Into<String>, score: f64) -> Self {
        Self {
            word: word.into(),
            score,
        }
    }
}
