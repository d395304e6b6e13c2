//! Merging strongly collocated word pairs into compound candidates.

use keyrank_core::{CandidateSet, CandidateWord, FeatureMap, TransitionStatistics, FALLBACK_TAG};
use tracing::debug;

/// `w1` must be followed by something more often than this.
pub const MIN_SUPPORT: u32 = 2;

/// Share of `w1`'s successors that must be `w2`, and of `w2`'s predecessors
/// that must be `w1`.
pub const MIN_RATIO: f64 = 0.8;

/// Create a compound `w1w2` for every pair that almost always occurs
/// together, appending it to `candidates` and giving it the larger of its
/// parts' densities. Compounds take `w2`'s tag.
///
/// Pairs are visited in lexicographic order and compounds are never merged
/// again. Returns the new compounds in creation order.
pub fn merge_collocations(
    density: &mut FeatureMap,
    candidates: &mut CandidateSet,
    transitions: &TransitionStatistics,
) -> Vec<String> {
    let mut created = Vec::new();

    for (w1, successors) in &transitions.next {
        let outgoing = transitions.outgoing_total(w1);
        if outgoing <= MIN_SUPPORT {
            continue;
        }

        for (w2, &forward) in successors {
            let Some(backward) = transitions.prev_count(w2, w1) else {
                continue;
            };
            let incoming = transitions.incoming_total(w2);
            if incoming == 0 {
                continue;
            }

            let forward_ratio = f64::from(forward) / f64::from(outgoing);
            let backward_ratio = f64::from(backward) / f64::from(incoming);
            if forward_ratio < MIN_RATIO || backward_ratio < MIN_RATIO {
                continue;
            }

            let compound = format!("{}{}", w1, w2);
            if candidates.contains(&compound) {
                continue;
            }

            let value = density
                .get(w1)
                .copied()
                .unwrap_or(0.0)
                .max(density.get(w2).copied().unwrap_or(0.0));
            let tag = candidates.tag_of(w2).unwrap_or(FALLBACK_TAG).to_string();

            debug!(
                "Collocation {} + {} ({:.2}/{:.2}) -> {}",
                w1, w2, forward_ratio, backward_ratio, compound
            );
            candidates.insert(CandidateWord::new(compound.clone(), tag));
            density.insert(compound.clone(), value);
            created.push(compound);
        }
    }

    created
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn stats(next: &[(&str, &str, u32)], outgoing: &[(&str, u32)], incoming: &[(&str, u32)]) -> TransitionStatistics {
        let mut s = TransitionStatistics::new();
        for &(a, b, count) in next {
            s.next.entry(a.to_string()).or_insert_with(BTreeMap::new).insert(b.to_string(), count);
            s.prev.entry(b.to_string()).or_insert_with(BTreeMap::new).insert(a.to_string(), count);
        }
        s.outgoing = outgoing.iter().map(|(w, c)| (w.to_string(), *c)).collect();
        s.incoming = incoming.iter().map(|(w, c)| (w.to_string(), *c)).collect();
        s
    }

    fn setup() -> (FeatureMap, CandidateSet) {
        let density: FeatureMap = [("神经".to_string(), 0.3), ("网络".to_string(), 0.7)].into_iter().collect();
        let candidates: CandidateSet = vec![
            CandidateWord::new("神经", "n"),
            CandidateWord::new("网络", "nz"),
        ]
        .into();
        (density, candidates)
    }

    #[test]
    fn test_strong_pair_merges() {
        let (mut density, mut candidates) = setup();
        let t = stats(
            &[("神经", "网络", 8), ("神经", "元", 2)],
            &[("神经", 10)],
            &[("网络", 9), ("元", 2)],
        );

        let created = merge_collocations(&mut density, &mut candidates, &t);
        assert_eq!(created, vec!["神经网络".to_string()]);
        assert_eq!(density["神经网络"], 0.7);
        assert_eq!(candidates.tag_of("神经网络"), Some("nz"));
        assert_eq!(candidates.words().last(), Some("神经网络"));
    }

    #[test]
    fn test_low_support_suppresses_merge() {
        let (mut density, mut candidates) = setup();
        let t = stats(&[("神经", "网络", 2)], &[("神经", 2)], &[("网络", 2)]);
        assert!(merge_collocations(&mut density, &mut candidates, &t).is_empty());
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn test_weak_backward_ratio_suppresses_merge() {
        let (mut density, mut candidates) = setup();
        let t = stats(&[("神经", "网络", 5)], &[("神经", 5)], &[("网络", 10)]);
        assert!(merge_collocations(&mut density, &mut candidates, &t).is_empty());
    }

    #[test]
    fn test_non_candidate_parts_default() {
        let mut density = FeatureMap::new();
        let mut candidates = CandidateSet::new();
        let t = stats(&[("机", "器", 4)], &[("机", 4)], &[("器", 4)]);

        let created = merge_collocations(&mut density, &mut candidates, &t);
        assert_eq!(created, vec!["机器".to_string()]);
        assert_eq!(density["机器"], 0.0);
        assert_eq!(candidates.tag_of("机器"), Some(FALLBACK_TAG));
    }

    #[test]
    fn test_existing_compound_left_alone() {
        let (mut density, mut candidates) = setup();
        candidates.insert(CandidateWord::new("神经网络", "n"));
        density.insert("神经网络".to_string(), 0.1);
        let t = stats(&[("神经", "网络", 8)], &[("神经", 8)], &[("网络", 8)]);

        assert!(merge_collocations(&mut density, &mut candidates, &t).is_empty());
        assert_eq!(density["神经网络"], 0.1);
        assert_eq!(candidates.tag_of("神经网络"), Some("n"));
    }
}
