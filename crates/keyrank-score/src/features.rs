//! Statistical features: TF-IDF, position, part of speech, length.

use std::collections::HashMap;

use keyrank_core::{min_max, normalize, CandidateSet, FeatureMap, ALLOWED_TAGS, NEUTRAL};
use keyrank_ingest::{NlpBackend, SentenceContext};
use once_cell::sync::Lazy;
use tracing::debug;

/// Part-of-speech weights. Proper nouns rank highest, adverbial and verbal
/// forms lowest.
static POS_WEIGHTS: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    HashMap::from([
        ("n", 1.2),
        ("j", 0.6),
        ("nr", 1.5),
        ("ns", 1.3),
        ("nsf", 1.3),
        ("nt", 1.4),
        ("nz", 1.4),
        ("an", 0.4),
        ("l", 0.4),
        ("vn", 0.6),
        ("i", 0.3),
        ("a", 0.3),
        ("vd", 0.3),
        ("ad", 0.2),
        ("v", 0.2),
        ("vg", 0.2),
    ])
});

/// Weight of a tag, 0 when it has none.
pub fn pos_weight(tag: &str) -> f64 {
    POS_WEIGHTS.get(tag).copied().unwrap_or(0.0)
}

/// Normalized TF-IDF. Candidates the backend did not weight get 0.5.
pub fn tfidf_feature(nlp: &dyn NlpBackend, text: &str, candidates: &CandidateSet) -> FeatureMap {
    if candidates.is_empty() {
        return FeatureMap::new();
    }
    let weights = nlp.term_weights(text, candidates.len(), ALLOWED_TAGS);
    let missing = candidates.words().filter(|w| !weights.contains_key(*w)).count();
    if missing > 0 {
        debug!("{} candidates without a TF-IDF weight", missing);
    }

    let raw: FeatureMap = candidates
        .words()
        .map(|w| (w.to_string(), weights.get(w).copied().unwrap_or(NEUTRAL)))
        .collect();
    normalize(candidates, &raw)
}

/// Normalized position feature.
///
/// Words whose density reaches the midpoint of the density range get +0.5
/// when they occur in the title, else +0.3 when they occur in the first or
/// last sentence. Everything starts at 0.5.
pub fn position_feature(
    density: &FeatureMap,
    candidates: &CandidateSet,
    sentences: &SentenceContext,
) -> FeatureMap {
    let density_of = |w: &str| density.get(w).copied().unwrap_or(NEUTRAL);
    let Some((min, max)) = min_max(candidates.words().map(density_of)) else {
        return FeatureMap::new();
    };
    let midpoint = (min + max) / 2.0;

    let raw: FeatureMap = candidates
        .words()
        .map(|w| {
            let mut value = 0.5;
            if density_of(w) >= midpoint {
                if sentences.in_title(w) {
                    value += 0.5;
                } else if sentences.in_first_or_last(w) {
                    value += 0.3;
                }
            }
            (w.to_string(), value)
        })
        .collect();
    normalize(candidates, &raw)
}

/// Normalized part-of-speech weight of each candidate's tag.
pub fn pos_feature(candidates: &CandidateSet) -> FeatureMap {
    let raw: FeatureMap = candidates
        .iter()
        .map(|c| (c.word.clone(), pos_weight(&c.tag)))
        .collect();
    normalize(candidates, &raw)
}

/// `min(chars / 10, 1)`; kept for inspection only.
pub fn length_feature(candidates: &CandidateSet) -> FeatureMap {
    candidates
        .words()
        .map(|w| (w.to_string(), (w.chars().count() as f64 / 10.0).min(1.0)))
        .collect()
}
