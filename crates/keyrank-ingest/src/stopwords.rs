//! Stop-word list.

use std::collections::HashSet;
use std::path::Path;

use once_cell::sync::Lazy;
use tracing::{info, warn};

/// Fallback list used when no stop-word file is configured.
static BUILTIN_STOP_WORDS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        // Chinese function words
        "的", "了", "在", "是", "我", "有", "和", "就", "不", "人", "都", "一", "一个",
        "上", "也", "很", "到", "说", "要", "去", "你", "会", "着", "没有", "看", "好",
        "自己", "这", "那", "他", "她", "它", "我们", "你们", "他们", "这个", "那个",
        "这些", "那些", "什么", "怎么", "如何", "因为", "所以", "但是", "而且", "或者",
        "如果", "虽然", "可以", "已经", "还是", "以及", "对于", "关于", "通过", "进行",
        "其中", "之一", "等", "等等", "与", "及", "或", "而", "并", "被", "把", "将",
        "从", "向", "为", "以", "之", "其", "此", "该", "各", "每", "使", "让",
        // English
        "a", "an", "the", "and", "or", "of", "to", "in", "on", "for", "with", "is",
        "are", "was", "were", "be", "been", "it", "this", "that", "as", "at", "by",
        "from",
    ]
});

/// Words excluded from candidates and transitions.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    pub fn builtin() -> Self {
        Self {
            words: BUILTIN_STOP_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Parse one word per line; blank lines are ignored.
    pub fn from_lines(text: &str) -> Self {
        Self {
            words: text
                .lines()
                .map(|l| l.trim_start_matches('\u{feff}').trim())
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Load from a file, falling back to the built-in list when it is absent
    /// or unreadable.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            info!("No stop-word file at {}, using built-in list", path.display());
            return Self::builtin();
        }
        match std::fs::read(path) {
            Ok(bytes) => {
                let words = Self::from_lines(&String::from_utf8_lossy(&bytes));
                info!("Loaded {} stop words from {}", words.len(), path.display());
                words
            }
            Err(e) => {
                warn!("Failed to read stop words {}: {}, using built-in list", path.display(), e);
                Self::builtin()
            }
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
