//! Segmentation, part-of-speech tagging and term weighting.
//!
//! The `NlpBackend` trait abstracts over the language toolkit.
//! Implementations:
//! - `JiebaBackend`: jieba-rs segmentation with HMM tagging and TF-IDF keywords
//! - `PretaggedBackend`: text that is already segmented as `word/tag` tokens

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use jieba_rs::{Jieba, KeywordExtract, TfIdf};
use keyrank_core::{DictionaryPaths, Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::sentences::SENTENCE_DELIMITERS;

/// One segmented word with its part-of-speech tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedToken {
    pub word: String,
    pub tag: String,
}

impl TaggedToken {
    pub fn new(word: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            tag: tag.into(),
        }
    }
}

/// Trait for NLP backends.
pub trait NlpBackend: Send + Sync {
    /// Segment and tag a text.
    fn tag(&self, text: &str) -> Vec<TaggedToken>;

    /// Weight up to `top_k` terms of `text` whose tag is in `allowed_tags`.
    /// Weights are non-negative.
    fn term_weights(&self, text: &str, top_k: usize, allowed_tags: &[&str]) -> HashMap<String, f64>;

    /// Short backend name for logs and reports.
    fn name(&self) -> &'static str;
}

/// jieba-rs backed segmentation, tagging and TF-IDF.
pub struct JiebaBackend {
    jieba: Jieba,
    tfidf: TfIdf,
}

impl JiebaBackend {
    /// Backend with jieba's bundled dictionary.
    pub fn new() -> Self {
        Self {
            jieba: Jieba::new(),
            tfidf: TfIdf::default(),
        }
    }

    /// Backend using the dictionaries found under `paths`.
    ///
    /// `dict.txt.big` replaces the bundled dictionary and `user_dict.txt` is
    /// layered on top; either may be absent.
    pub fn load(paths: &DictionaryPaths) -> Result<Self> {
        let mut jieba = if paths.main_dict.exists() {
            let mut reader = open_dict(&paths.main_dict)?;
            let jieba = Jieba::with_dict(&mut reader)
                .map_err(|e| Error::Nlp(format!("{}: {:?}", paths.main_dict.display(), e)))?;
            info!("Loaded main dictionary {}", paths.main_dict.display());
            jieba
        } else {
            debug!("No main dictionary at {}, using bundled", paths.main_dict.display());
            Jieba::new()
        };

        if paths.user_dict.exists() {
            let mut reader = open_dict(&paths.user_dict)?;
            jieba
                .load_dict(&mut reader)
                .map_err(|e| Error::Nlp(format!("{}: {:?}", paths.user_dict.display(), e)))?;
            info!("Loaded user dictionary {}", paths.user_dict.display());
        }

        Ok(Self {
            jieba,
            tfidf: TfIdf::default(),
        })
    }
}

impl Default for JiebaBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn open_dict(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path)
        .map_err(|e| Error::Nlp(format!("{}: {}", path.display(), e)))?;
    Ok(BufReader::new(file))
}

impl NlpBackend for JiebaBackend {
    fn tag(&self, text: &str) -> Vec<TaggedToken> {
        self.jieba
            .tag(text, true)
            .into_iter()
            .map(|t| TaggedToken::new(t.word, t.tag))
            .collect()
    }

    fn term_weights(&self, text: &str, top_k: usize, allowed_tags: &[&str]) -> HashMap<String, f64> {
        let allowed = allowed_tags.iter().map(|t| t.to_string()).collect();
        self.tfidf
            .extract_keywords(&self.jieba, text, top_k, allowed)
            .into_iter()
            .map(|k| (k.keyword, k.weight.max(0.0)))
            .collect()
    }

    fn name(&self) -> &'static str {
        "jieba"
    }
}

/// Backend for text already segmented as whitespace-separated `word/tag`
/// tokens. A token without a tag is tagged `x`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PretaggedBackend;

impl PretaggedBackend {
    pub fn new() -> Self {
        Self
    }
}

impl NlpBackend for PretaggedBackend {
    fn tag(&self, text: &str) -> Vec<TaggedToken> {
        text.split(|c: char| c.is_whitespace() || SENTENCE_DELIMITERS.contains(&c))
            .filter(|token| !token.is_empty())
            .map(|token| match token.rsplit_once('/') {
                Some((word, tag)) if !word.is_empty() && !tag.is_empty() => {
                    TaggedToken::new(word, tag)
                }
                _ => TaggedToken::new(token, "x"),
            })
            .collect()
    }

    /// Relative term frequency over all tokens of the text.
    fn term_weights(&self, text: &str, top_k: usize, allowed_tags: &[&str]) -> HashMap<String, f64> {
        let tokens = self.tag(text);
        if tokens.is_empty() {
            return HashMap::new();
        }

        let mut counts: Vec<(String, usize)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for token in tokens.iter().filter(|t| allowed_tags.contains(&t.tag.as_str())) {
            match index.get(&token.word) {
                Some(&pos) => counts[pos].1 += 1,
                None => {
                    index.insert(token.word.clone(), counts.len());
                    counts.push((token.word.clone(), 1));
                }
            }
        }

        // Stable: equal counts keep first-occurrence order.
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        let total = tokens.len() as f64;
        counts
            .into_iter()
            .take(top_k)
            .map(|(word, count)| (word, count as f64 / total))
            .collect()
    }

    fn name(&self) -> &'static str {
        "pretagged"
    }
}

/// Which backend to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    #[default]
    Jieba,
    Pretagged,
}

/// Create the requested backend.
pub fn create_backend(kind: BackendKind, paths: &DictionaryPaths) -> Result<Arc<dyn NlpBackend>> {
    let backend: Arc<dyn NlpBackend> = match kind {
        BackendKind::Jieba => Arc::new(JiebaBackend::load(paths)?),
        BackendKind::Pretagged => Arc::new(PretaggedBackend::new()),
    };
    info!("Using {} NLP backend", backend.name());
    Ok(backend)
}
