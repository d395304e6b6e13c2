//! Data model: candidate words, transition statistics, pipeline stages.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Part-of-speech tags a keyword candidate may carry: adjectives, idioms,
/// abbreviations, verbs, nouns and proper-noun subtypes.
pub const ALLOWED_TAGS: &[&str] = &[
    "a", "ad", "an", "i", "j", "l", "v", "vg", "vd", "vn", "n", "ns", "nsf", "nt", "nz",
];

/// Tags that break transitions: punctuation and unknown tokens.
pub const DISALLOWED_TAGS: &[&str] = &["x", "w"];

/// Tag used when a compound's head word carries none.
pub const FALLBACK_TAG: &str = "n";

pub fn is_allowed_tag(tag: &str) -> bool {
    ALLOWED_TAGS.contains(&tag)
}

pub fn is_disallowed_tag(tag: &str) -> bool {
    DISALLOWED_TAGS.contains(&tag)
}

/// A content word eligible to become a keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateWord {
    pub word: String,
    pub tag: String,
}

impl CandidateWord {
    pub fn new(word: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            tag: tag.into(),
        }
    }

    /// Build a candidate only if the word has at least two characters and an
    /// allowed tag. Stop-word filtering is left to the caller.
    pub fn checked(word: &str, tag: &str) -> Option<Self> {
        if word.chars().count() >= 2 && is_allowed_tag(tag) {
            Some(Self::new(word, tag))
        } else {
            None
        }
    }
}

/// Ordered, duplicate-free set of candidates.
///
/// Iteration follows insertion order, which is also the tie-break order when
/// ranking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<CandidateWord>", into = "Vec<CandidateWord>")]
pub struct CandidateSet {
    words: Vec<CandidateWord>,
    index: HashMap<String, usize>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a candidate. A word already present keeps its position and takes
    /// the new tag. Returns `true` if the word was new.
    pub fn insert(&mut self, candidate: CandidateWord) -> bool {
        if let Some(&pos) = self.index.get(&candidate.word) {
            self.words[pos].tag = candidate.tag;
            return false;
        }
        self.index.insert(candidate.word.clone(), self.words.len());
        self.words.push(candidate);
        true
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    pub fn get(&self, word: &str) -> Option<&CandidateWord> {
        self.index.get(word).map(|&pos| &self.words[pos])
    }

    pub fn tag_of(&self, word: &str) -> Option<&str> {
        self.get(word).map(|c| c.tag.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CandidateWord> {
        self.words.iter()
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(|c| c.word.as_str())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl From<Vec<CandidateWord>> for CandidateSet {
    fn from(words: Vec<CandidateWord>) -> Self {
        let mut set = Self::new();
        for word in words {
            set.insert(word);
        }
        set
    }
}

impl From<CandidateSet> for Vec<CandidateWord> {
    fn from(set: CandidateSet) -> Self {
        set.words
    }
}

impl FromIterator<CandidateWord> for CandidateSet {
    fn from_iter<I: IntoIterator<Item = CandidateWord>>(iter: I) -> Self {
        iter.into_iter().collect::<Vec<_>>().into()
    }
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = &'a CandidateWord;
    type IntoIter = std::slice::Iter<'a, CandidateWord>;

    fn into_iter(self) -> Self::IntoIter {
        self.words.iter()
    }
}

/// Adjacency counts between consecutive words of a document.
///
/// `next[w1][w2]` counts `w2` directly following `w1`; `prev[w2][w1]` is the
/// mirrored view. `outgoing`/`incoming` are per-word totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitionStatistics {
    pub next: BTreeMap<String, BTreeMap<String, u32>>,
    pub prev: BTreeMap<String, BTreeMap<String, u32>>,
    pub outgoing: BTreeMap<String, u32>,
    pub incoming: BTreeMap<String, u32>,
}

impl TransitionStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `second` directly after `first`.
    pub fn record(&mut self, first: &str, second: &str) {
        *self
            .next
            .entry(first.to_string())
            .or_default()
            .entry(second.to_string())
            .or_insert(0) += 1;
        *self
            .prev
            .entry(second.to_string())
            .or_default()
            .entry(first.to_string())
            .or_insert(0) += 1;
        *self.outgoing.entry(first.to_string()).or_insert(0) += 1;
        *self.incoming.entry(second.to_string()).or_insert(0) += 1;
    }

    pub fn next_count(&self, first: &str, second: &str) -> u32 {
        self.next
            .get(first)
            .and_then(|m| m.get(second))
            .copied()
            .unwrap_or(0)
    }

    /// `None` when `first` never precedes `second`.
    pub fn prev_count(&self, second: &str, first: &str) -> Option<u32> {
        self.prev.get(second).and_then(|m| m.get(first)).copied()
    }

    pub fn outgoing_total(&self, word: &str) -> u32 {
        self.outgoing.get(word).copied().unwrap_or(0)
    }

    pub fn incoming_total(&self, word: &str) -> u32 {
        self.incoming.get(word).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.next.is_empty()
    }
}

/// Pipeline stages, in producer → consumer order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Preprocess,
    Semantic,
    Statistical,
    Scoring,
}

impl Stage {
    pub fn all() -> &'static [Stage] {
        &[
            Self::Preprocess,
            Self::Semantic,
            Self::Statistical,
            Self::Scoring,
        ]
    }

    /// Directory name of this stage's artifacts.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Preprocess => "preprocess",
            Self::Semantic => "semantic",
            Self::Statistical => "statistical",
            Self::Scoring => "scoring",
        }
    }

    /// Every stage whose artifacts this one reads.
    pub fn inputs(&self) -> &'static [Stage] {
        match self {
            Self::Preprocess => &[],
            Self::Semantic => &[Self::Preprocess],
            Self::Statistical => &[Self::Preprocess, Self::Semantic],
            Self::Scoring => &[Self::Preprocess, Self::Semantic, Self::Statistical],
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Stage {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::all()
            .iter()
            .copied()
            .find(|stage| stage.as_str() == s.to_lowercase())
            .ok_or_else(|| crate::Error::Config(format!("unknown stage: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_candidate() {
        assert!(CandidateWord::checked("网络", "n").is_some());
        assert!(CandidateWord::checked("网", "n").is_none());
        assert!(CandidateWord::checked("网络", "x").is_none());
        assert!(CandidateWord::checked("的话", "u").is_none());
    }

    #[test]
    fn test_candidate_set_keeps_first_position_and_latest_tag() {
        let mut set = CandidateSet::new();
        assert!(set.insert(CandidateWord::new("发展", "vn")));
        assert!(set.insert(CandidateWord::new("经济", "n")));
        assert!(!set.insert(CandidateWord::new("发展", "v")));

        let words: Vec<&str> = set.words().collect();
        assert_eq!(words, vec!["发展", "经济"]);
        assert_eq!(set.tag_of("发展"), Some("v"));
    }

    #[test]
    fn test_candidate_set_serializes_as_list() {
        let set: CandidateSet = vec![CandidateWord::new("经济", "n")].into();
        let json = serde_json::to_value(&set).unwrap();
        assert!(json.is_array());
        let back: CandidateSet = serde_json::from_value(json).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn test_transition_record() {
        let mut stats = TransitionStatistics::new();
        stats.record("神经", "网络");
        stats.record("神经", "网络");
        stats.record("神经", "元");

        assert_eq!(stats.next_count("神经", "网络"), 2);
        assert_eq!(stats.prev_count("网络", "神经"), Some(2));
        assert_eq!(stats.prev_count("网络", "元"), None);
        assert_eq!(stats.outgoing_total("神经"), 3);
        assert_eq!(stats.incoming_total("网络"), 2);
    }

    #[test]
    fn test_stage_order_and_parse() {
        let stages = Stage::all();
        assert_eq!(stages.len(), 4);
        assert!(Stage::Preprocess.inputs().is_empty());
        assert_eq!(Stage::Statistical.inputs(), &[Stage::Preprocess, Stage::Semantic]);
        assert!(Stage::Scoring.inputs().contains(&Stage::Statistical));
        assert_eq!("Semantic".parse::<Stage>().unwrap(), Stage::Semantic);
        assert!("evict".parse::<Stage>().is_err());
    }
}
