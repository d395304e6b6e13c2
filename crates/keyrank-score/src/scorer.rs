//! Composite scoring and keyword selection.

use keyrank_core::CandidateSet;
use tracing::debug;

use crate::types::{Features, ScoredWord, ScoringWeights};

/// Score one word. Missing feature values count as 0.
pub fn score_word(word: &str, features: &Features, weights: &ScoringWeights) -> f64 {
    let value = |map: &keyrank_core::FeatureMap| map.get(word).copied().unwrap_or(0.0);
    let density = value(&features.density);
    let tfidf = value(&features.tfidf);
    let position = value(&features.position);
    let pos = value(&features.pos);

    let statistical = weights.pos * pos + weights.position * position + weights.tfidf * tfidf;
    (weights.semantic * density + weights.statistical * statistical)
        * (1.0 + weights.position_boost * position)
}

/// Every candidate, best first. Equal scores keep candidate order.
pub fn rank(candidates: &CandidateSet, features: &Features, weights: &ScoringWeights) -> Vec<ScoredWord> {
    let mut ranked: Vec<ScoredWord> = candidates
        .words()
        .map(|w| ScoredWord::new(w, score_word(w, features, weights)))
        .collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}

/// The leading words scoring strictly above `floor`, at most `limit` of them.
pub fn select_keywords(ranked: &[ScoredWord], floor: f64, limit: usize) -> Vec<ScoredWord> {
    let keywords: Vec<ScoredWord> = ranked
        .iter()
        .take_while(|w| w.score > floor)
        .take(limit)
        .cloned()
        .collect();
    debug!(
        "Selected {} of {} words above {}",
        keywords.len(),
        ranked.len(),
        floor
    );
    keywords
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyrank_core::{CandidateWord, FeatureMap};

    fn uniform(words: &[String], value: f64) -> FeatureMap {
        words.iter().map(|w| (w.clone(), value)).collect()
    }

    #[test]
    fn test_score_formula() {
        let features = Features {
            density: [("词语".to_string(), 1.0)].into_iter().collect(),
            tfidf: [("词语".to_string(), 0.5)].into_iter().collect(),
            position: [("词语".to_string(), 1.0)].into_iter().collect(),
            pos: [("词语".to_string(), 0.0)].into_iter().collect(),
        };
        let score = score_word("词语", &features, &ScoringWeights::default());
        // (0.4 + 0.6 * (0.8 + 0.6)) * 1.2
        assert!((score - 1.488).abs() < 1e-12);
        assert_eq!(score_word("缺失", &features, &ScoringWeights::default()), 0.0);
    }

    #[test]
    fn test_rank_is_stable() {
        let words: Vec<String> = ["甲方", "乙方", "丙方"].iter().map(|w| w.to_string()).collect();
        let candidates: CandidateSet = words.iter().map(|w| CandidateWord::new(w.as_str(), "n")).collect();
        let mut features = Features {
            density: uniform(&words, 0.5),
            ..Default::default()
        };
        features.density.insert("丙方".to_string(), 0.9);

        let ranked = rank(&candidates, &features, &ScoringWeights::default());
        let order: Vec<&str> = ranked.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(order, vec!["丙方", "甲方", "乙方"]);
    }

    #[test]
    fn test_select_top_twenty() {
        let words: Vec<String> = (0..30).map(|i| format!("词{:02}", i)).collect();
        let candidates: CandidateSet = words.iter().map(|w| CandidateWord::new(w.as_str(), "n")).collect();
        let features = Features {
            density: words
                .iter()
                .enumerate()
                .map(|(i, w)| (w.clone(), i as f64 / 29.0))
                .collect(),
            tfidf: uniform(&words, 0.5),
            ..Default::default()
        };

        let ranked = rank(&candidates, &features, &ScoringWeights::default());
        assert!(ranked.iter().all(|w| w.score > 0.1));
        let keywords = select_keywords(&ranked, 0.1, 20);
        assert_eq!(keywords.len(), 20);
        assert!(keywords.windows(2).all(|p| p[0].score >= p[1].score));
        assert_eq!(keywords[0].word, "词29");
    }

    #[test]
    fn test_select_respects_floor() {
        let ranked = vec![
            ScoredWord::new("高分", 0.9),
            ScoredWord::new("边界", 0.1),
            ScoredWord::new("低分", 0.05),
        ];
        let keywords = select_keywords(&ranked, 0.1, 20);
        assert_eq!(keywords, vec![ScoredWord::new("高分", 0.9)]);
    }
}
