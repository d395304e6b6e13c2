//! Coded synonym thesaurus.
//!
//! Each record is an 8-character sense code, one delimiter character and a
//! whitespace-separated word list:
//!
//! ```text
//! Aa01A01= 人 士 人物 人士 人氏 人选
//! ```
//!
//! Code layout: major class (letter), minor class (letter), sub-class (two
//! digits), word group (letter), atomic group (two digits), terminator
//! (`=` synonyms, `#` related, `@` self-contained).

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Width of a sense code.
pub const CODE_LEN: usize = 8;

static CODE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z]{2}[0-9]{2}[A-Za-z][0-9]{2}[=#@]$").expect("sense code pattern")
});

/// A validated 8-character sense code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SenseCode(String);

impl SenseCode {
    pub fn parse(code: &str) -> Option<Self> {
        if CODE_PATTERN.is_match(code) {
            Some(Self(code.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Codes are ASCII, so byte positions are character positions.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn terminator(&self) -> char {
        char::from(self.as_bytes()[CODE_LEN - 1])
    }

    /// The two-digit field starting at `pos` (2 or 5).
    pub(crate) fn number_at(&self, pos: usize) -> u32 {
        self.0
            .get(pos..pos + 2)
            .and_then(|digits| digits.parse().ok())
            .unwrap_or(0)
    }
}

impl std::fmt::Display for SenseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable thesaurus: code → words, word → codes, prefix counts.
#[derive(Debug, Clone, Default)]
pub struct Thesaurus {
    entries: BTreeMap<SenseCode, Vec<String>>,
    word_codes: HashMap<String, Vec<SenseCode>>,
    prefix_counts: HashMap<String, usize>,
}

impl Thesaurus {
    /// Load from disk. An absent or unreadable file yields an empty thesaurus.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            warn!("Thesaurus not found at {}, similarity disabled", path.display());
            return Self::default();
        }
        match std::fs::read(path) {
            Ok(bytes) => {
                let thesaurus = Self::from_bytes(&bytes);
                info!(
                    "Loaded thesaurus {}: {} codes, {} words",
                    path.display(),
                    thesaurus.len(),
                    thesaurus.word_count()
                );
                thesaurus
            }
            Err(e) => {
                warn!("Failed to read thesaurus {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse raw bytes; lines that are not valid UTF-8 are skipped.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut entries = BTreeMap::new();
        let mut skipped = 0usize;

        for (lineno, raw) in bytes.split(|&b| b == b'\n').enumerate() {
            let Ok(line) = std::str::from_utf8(raw) else {
                debug!("Thesaurus line {}: not UTF-8", lineno + 1);
                skipped += 1;
                continue;
            };
            let line = line.trim_start_matches('\u{feff}').trim_end();
            if line.trim().is_empty() {
                continue;
            }
            match parse_record(line) {
                Some((code, words)) => {
                    entries.insert(code, words);
                }
                None => {
                    debug!("Thesaurus line {}: malformed record {:?}", lineno + 1, line);
                    skipped += 1;
                }
            }
        }

        if skipped > 0 {
            warn!("Skipped {} malformed thesaurus lines", skipped);
        }
        Self::from_entries(entries)
    }

    pub fn parse(text: &str) -> Self {
        Self::from_bytes(text.as_bytes())
    }

    fn from_entries(entries: BTreeMap<SenseCode, Vec<String>>) -> Self {
        let mut word_codes: HashMap<String, Vec<SenseCode>> = HashMap::new();
        let mut prefix_counts: HashMap<String, usize> = HashMap::new();

        for (code, words) in &entries {
            for word in words {
                let codes = word_codes.entry(word.clone()).or_default();
                if !codes.contains(code) {
                    codes.push(code.clone());
                }
            }
            for len in 1..CODE_LEN {
                *prefix_counts.entry(code.as_str()[..len].to_string()).or_insert(0) += 1;
            }
        }

        Self {
            entries,
            word_codes,
            prefix_counts,
        }
    }

    /// Sense codes of a word, in code order. Empty when the word is unknown.
    pub fn codes_of(&self, word: &str) -> &[SenseCode] {
        self.word_codes.get(word).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn words_of(&self, code: &SenseCode) -> &[String] {
        self.entries.get(code).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_word(&self, word: &str) -> bool {
        self.word_codes.contains_key(word)
    }

    /// Number of distinct codes starting with `prefix`.
    pub fn prefix_count(&self, prefix: &str) -> usize {
        match prefix.len() {
            0 => 0,
            CODE_LEN => usize::from(
                SenseCode::parse(prefix).is_some_and(|code| self.entries.contains_key(&code)),
            ),
            _ => self.prefix_counts.get(prefix).copied().unwrap_or(0),
        }
    }

    /// Number of codes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct words.
    pub fn word_count(&self) -> usize {
        self.word_codes.len()
    }
}

/// `CODE` + one delimiter + words. Words shorter than two characters are
/// dropped; a record left without words is rejected.
fn parse_record(line: &str) -> Option<(SenseCode, Vec<String>)> {
    let code = SenseCode::parse(line.get(..CODE_LEN)?)?;
    let mut rest = line[CODE_LEN..].chars();
    rest.next()?;

    let words: Vec<String> = rest
        .as_str()
        .split_whitespace()
        .filter(|w| w.chars().count() > 1)
        .map(str::to_string)
        .collect();

    if words.is_empty() {
        None
    } else {
        Some((code, words))
    }
}
