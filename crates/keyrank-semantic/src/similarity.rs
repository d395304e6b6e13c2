//! Sense-code similarity.
//!
//! Two codes are compared at the depth of their longest shared prefix. The
//! deeper the split, the higher the tier weight; within a tier the score is
//! damped by how crowded the shared branch is (`n`) and how far apart the
//! two codes sit in it (`k`).

use crate::thesaurus::{SenseCode, Thesaurus, CODE_LEN};

/// Score for unclassified codes, codes with nothing in common, and codes
/// that differ only in their terminator.
const FLOOR: f64 = 0.1;

/// Weight of each depth at which two codes can split.
fn tier_weight(depth: usize) -> Option<f64> {
    match depth {
        1 => Some(0.65),
        2 => Some(0.8),
        4 => Some(0.85),
        5 => Some(0.9),
        _ => None,
    }
}

/// Length of the common prefix, snapped back to a field boundary.
///
/// A split inside a two-digit field (after 3 or 6 characters) counts as a
/// split at the start of that field.
pub fn shared_prefix_len(a: &SenseCode, b: &SenseCode) -> usize {
    let len = a
        .as_bytes()
        .iter()
        .zip(b.as_bytes())
        .take_while(|(x, y)| x == y)
        .count();
    match len {
        3 | 6 => len - 1,
        _ => len,
    }
}

/// Distance between the two codes in the field right after `depth`.
pub fn sibling_distance(a: &SenseCode, b: &SenseCode, depth: usize) -> u32 {
    match depth {
        0 | 1 | 4 => u32::from(a.as_bytes()[depth].abs_diff(b.as_bytes()[depth])),
        2 | 5 => a.number_at(depth).abs_diff(b.number_at(depth)),
        _ => 0,
    }
}

/// Similarity of two individual codes. May be negative for very crowded
/// branches with distant siblings.
pub fn pair_similarity(a: &SenseCode, b: &SenseCode, thesaurus: &Thesaurus) -> f64 {
    let depth = shared_prefix_len(a, b);
    if a.terminator() == '@' || b.terminator() == '@' || depth == 0 {
        return FLOOR;
    }

    if let Some(weight) = tier_weight(depth) {
        let n = thesaurus.prefix_count(&a.as_str()[..depth]) as f64;
        if n == 0.0 {
            return 0.0;
        }
        let k = f64::from(sibling_distance(a, b, depth));
        return weight * (n * std::f64::consts::PI / 180.0).cos() * ((n - k + 1.0) / n);
    }

    match (depth, a.terminator()) {
        (CODE_LEN, '#') => 0.9,
        (CODE_LEN, '=') => 1.0,
        _ => FLOOR,
    }
}

/// Similarity of two words given their code sets: the best code pair,
/// never below 0, clamped into `[0, 1]`.
pub fn code_similarity(a: &[SenseCode], b: &[SenseCode], thesaurus: &Thesaurus) -> f64 {
    let mut best = 0.0_f64;
    for code_a in a {
        for code_b in b {
            let sim = pair_similarity(code_a, code_b, thesaurus);
            if sim > best {
                best = sim;
            }
        }
    }
    best.clamp(0.0, 1.0)
}

impl Thesaurus {
    /// Similarity of two words. Unknown words score 0.
    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        code_similarity(self.codes_of(a), self.codes_of(b), self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> SenseCode {
        SenseCode::parse(s).unwrap()
    }

    fn sample() -> Thesaurus {
        Thesaurus::parse(
            "Aa01A01= 人物 人士 人选\n\
             Aa01A02= 人类 全人类\n\
             Aa01A03# 男女 孩子\n\
             Aa01B01= 群众 大众\n\
             Aa02A01= 我们 咱们\n\
             Ab01A01= 男人 男子\n\
             Ba01A01= 物质 物体\n\
             Ba01A02@ 单独\n\
             Ca01A01# 时间 时光\n",
        )
    }

    #[test]
    fn test_shared_prefix_len_snaps_to_field() {
        assert_eq!(shared_prefix_len(&code("Aa01A01="), &code("Aa02A01=")), 2);
        assert_eq!(shared_prefix_len(&code("Aa01A01="), &code("Aa01A02=")), 5);
        assert_eq!(shared_prefix_len(&code("Aa01A01="), &code("Aa01B01=")), 4);
        assert_eq!(shared_prefix_len(&code("Aa01A01="), &code("Ba01A01=")), 0);
        assert_eq!(shared_prefix_len(&code("Aa01A01="), &code("Aa01A01=")), 8);
    }

    #[test]
    fn test_sibling_distance() {
        assert_eq!(sibling_distance(&code("Aa01A01="), &code("Ad01A01="), 1), 3);
        assert_eq!(sibling_distance(&code("Aa01A01="), &code("Aa01A11="), 5), 10);
        assert_eq!(sibling_distance(&code("Aa01A01="), &code("Aa07A01="), 2), 6);
        assert_eq!(sibling_distance(&code("Aa01A01="), &code("Aa01A01#"), 7), 0);
    }

    #[test]
    fn test_identical_synonym_code_is_one() {
        let t = sample();
        assert_eq!(t.similarity("人物", "人士"), 1.0);
        assert_eq!(t.similarity("男女", "孩子"), 0.9);
    }

    #[test]
    fn test_atomic_group_split() {
        let t = sample();
        // n = 3 codes under Aa01A, k = 1
        let expected = 0.9 * (3.0_f64.to_radians()).cos() * (3.0 / 3.0);
        assert!((t.similarity("人物", "人类") - expected).abs() < 1e-12);
    }

    #[test]
    fn test_floor_cases() {
        let t = sample();
        assert_eq!(t.similarity("物质", "单独"), 0.1);
        assert_eq!(t.similarity("人物", "时间"), 0.1);
        assert_eq!(
            pair_similarity(&code("Aa01A01="), &code("Aa01A01#"), &t),
            0.1
        );
    }

    #[test]
    fn test_unknown_word_is_zero() {
        let t = sample();
        assert_eq!(t.similarity("人物", "火星"), 0.0);
        assert_eq!(t.similarity("火星", "火星"), 0.0);
    }

    #[test]
    fn test_symmetric_and_bounded() {
        let t = sample();
        let words = ["人物", "人类", "男女", "群众", "我们", "男人", "物质", "单独", "时间", "火星"];
        for a in words {
            for b in words {
                let ab = t.similarity(a, b);
                assert_eq!(ab, t.similarity(b, a), "{} / {}", a, b);
                assert!((0.0..=1.0).contains(&ab));
            }
        }
    }

    #[test]
    fn test_best_pair_wins() {
        let t = Thesaurus::parse("Aa01A01= 苹果 水果\nBa01A01= 苹果 手机\nCa01A01= 水果\n");
        assert_eq!(t.similarity("苹果", "手机"), 1.0);
        assert_eq!(t.similarity("苹果", "水果"), 1.0);
    }
}
