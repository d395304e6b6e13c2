//! Per-word feature maps and their normalization.

use std::collections::BTreeMap;

use crate::types::CandidateSet;

/// Word → feature value.
pub type FeatureMap = BTreeMap<String, f64>;

/// Value used whenever a feature is missing or carries no signal.
pub const NEUTRAL: f64 = 0.5;

/// Ranges narrower than this are treated as "all values equal".
const DEGENERATE_RANGE: f64 = 1e-10;

/// Min-max normalize `map` over the words of `candidates`.
///
/// Only candidate words present in `map` are kept. When every value is the
/// same, each of them becomes [`NEUTRAL`].
pub fn normalize(candidates: &CandidateSet, map: &FeatureMap) -> FeatureMap {
    let present: Vec<(&str, f64)> = candidates
        .iter()
        .filter_map(|c| map.get(&c.word).map(|&v| (c.word.as_str(), v)))
        .collect();

    let Some((min, max)) = min_max(present.iter().map(|(_, v)| *v)) else {
        return FeatureMap::new();
    };

    let range = max - min;
    present
        .into_iter()
        .map(|(word, value)| {
            let scaled = if range.abs() < DEGENERATE_RANGE {
                NEUTRAL
            } else {
                (value - min) / range
            };
            (word.to_string(), scaled)
        })
        .collect()
}

/// Restrict `map` to the candidate words, filling gaps with `default`.
///
/// Returns the reconciled map and the number of entries that were dropped
/// because they named a word outside the candidate set.
pub fn reconcile(candidates: &CandidateSet, map: &FeatureMap, default: f64) -> (FeatureMap, usize) {
    let dropped = map.keys().filter(|w| !candidates.contains(w.as_str())).count();
    let reconciled = candidates
        .iter()
        .map(|c| {
            let value = map.get(&c.word).copied().unwrap_or(default);
            (c.word.clone(), value)
        })
        .collect();
    (reconciled, dropped)
}

/// Smallest and largest of the values, `None` when there are none.
pub fn min_max(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values.into_iter().fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CandidateWord;

    fn candidates(words: &[&str]) -> CandidateSet {
        let mut set = CandidateSet::new();
        for w in words {
            set.insert(CandidateWord::new(*w, "n"));
        }
        set
    }

    fn map(entries: &[(&str, f64)]) -> FeatureMap {
        entries.iter().map(|(w, v)| (w.to_string(), *v)).collect()
    }

    #[test]
    fn test_normalize_scales_to_unit_range() {
        let set = candidates(&["alpha", "beta", "gamma"]);
        let result = normalize(&set, &map(&[("alpha", 2.0), ("beta", 4.0), ("gamma", 3.0)]));
        assert_eq!(result["alpha"], 0.0);
        assert_eq!(result["beta"], 1.0);
        assert!((result["gamma"] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let set = candidates(&["alpha", "beta", "gamma"]);
        let once = normalize(&set, &map(&[("alpha", 0.0), ("beta", 1.0), ("gamma", 0.25)]));
        let twice = normalize(&set, &once);
        assert_eq!(once, twice);
        assert_eq!(twice["gamma"], 0.25);
    }

    #[test]
    fn test_normalize_single_value_is_neutral() {
        let set = candidates(&["alpha", "beta"]);
        let result = normalize(&set, &map(&[("alpha", 7.0), ("beta", 7.0)]));
        assert!(result.values().all(|&v| v == NEUTRAL));
    }

    #[test]
    fn test_normalize_ignores_non_candidates() {
        let set = candidates(&["alpha"]);
        let result = normalize(&set, &map(&[("alpha", 1.0), ("stray", 9.0)]));
        assert_eq!(result.len(), 1);
        assert_eq!(result["alpha"], NEUTRAL);
    }

    #[test]
    fn test_normalize_empty() {
        let set = candidates(&["alpha"]);
        assert!(normalize(&set, &FeatureMap::new()).is_empty());
    }

    #[test]
    fn test_reconcile_backfills_and_drops() {
        let set = candidates(&["alpha", "beta"]);
        let (result, dropped) = reconcile(&set, &map(&[("alpha", 0.9), ("stray", 0.1)]), NEUTRAL);
        assert_eq!(dropped, 1);
        assert_eq!(result["alpha"], 0.9);
        assert_eq!(result["beta"], NEUTRAL);
        assert!(!result.contains_key("stray"));
    }
}
