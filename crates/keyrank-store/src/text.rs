//! Plain-text renderings of artifacts: one `key\tvalue` row per line.

use std::fmt::Display;

use keyrank_core::{CandidateSet, FeatureMap};

/// One `key\tvalue` line per row.
pub fn tab_lines<K: Display, V: Display>(rows: impl IntoIterator<Item = (K, V)>) -> String {
    let mut out = String::new();
    for (key, value) in rows {
        out.push_str(&format!("{}\t{}\n", key, value));
    }
    out
}

/// One item per line.
pub fn lines<T: Display>(items: impl IntoIterator<Item = T>) -> String {
    let mut out = String::new();
    for item in items {
        out.push_str(&format!("{}\n", item));
    }
    out
}

pub fn feature_text(map: &FeatureMap) -> String {
    tab_lines(map.iter())
}

pub fn candidates_text(candidates: &CandidateSet) -> String {
    tab_lines(candidates.iter().map(|c| (&c.word, &c.tag)))
}
