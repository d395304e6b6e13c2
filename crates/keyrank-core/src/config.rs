//! Configuration and dictionary directory management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default number of keywords returned per document.
pub const DEFAULT_TOP_K: usize = 20;

/// Default score floor; candidates at or below it are never keywords.
pub const DEFAULT_SCORE_FLOOR: f64 = 0.1;

/// Paths to the linguistic resources keyrank reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictionaryPaths {
    /// Root dictionary directory (e.g., `dict/`).
    pub root: PathBuf,
    /// Coded synonym thesaurus (`dict/cilin.txt`).
    pub thesaurus: PathBuf,
    /// Stop words, one per line (`dict/stop_words.txt`).
    pub stop_words: PathBuf,
    /// Replacement main segmentation dictionary (`dict/dict.txt.big`).
    pub main_dict: PathBuf,
    /// Extra segmentation entries (`dict/user_dict.txt`).
    pub user_dict: PathBuf,
}

impl DictionaryPaths {
    /// Resolve resource paths under a root directory. Files may be absent;
    /// every consumer degrades to built-in defaults.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        Self {
            thesaurus: root.join("cilin.txt"),
            stop_words: root.join("stop_words.txt"),
            main_dict: root.join("dict.txt.big"),
            user_dict: root.join("user_dict.txt"),
            root,
        }
    }
}

/// Top-level keyrank configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyrankConfig {
    /// Linguistic resources.
    pub dict_paths: DictionaryPaths,
    /// Root under which per-document artifact directories are created.
    /// `None` places them next to each document.
    pub output_root: Option<PathBuf>,
    /// Maximum number of keywords kept per document.
    pub top_k: usize,
    /// Keywords must score strictly above this value.
    pub score_floor: f64,
}

impl KeyrankConfig {
    /// Create configuration with defaults for the given dictionary directory.
    pub fn new(dict_dir: impl AsRef<Path>) -> Self {
        Self {
            dict_paths: DictionaryPaths::new(dict_dir),
            output_root: None,
            top_k: DEFAULT_TOP_K,
            score_floor: DEFAULT_SCORE_FLOOR,
        }
    }

    /// Create configuration from environment and defaults.
    pub fn from_env(dict_dir: impl AsRef<Path>) -> Self {
        let mut config = Self::new(dict_dir);

        config.output_root = std::env::var("KEYRANK_OUTPUT_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        if let Some(top_k) = parse_env::<usize>("KEYRANK_TOP_K") {
            config.top_k = top_k;
        }
        if let Some(floor) = parse_env::<f64>("KEYRANK_SCORE_FLOOR") {
            config.score_floor = floor;
        }

        config
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!("Ignoring unparseable {}={:?}", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dictionary_paths() {
        let paths = DictionaryPaths::new("/opt/keyrank/dict");
        assert_eq!(paths.thesaurus, PathBuf::from("/opt/keyrank/dict/cilin.txt"));
        assert_eq!(paths.stop_words, PathBuf::from("/opt/keyrank/dict/stop_words.txt"));
        assert_eq!(paths.user_dict, PathBuf::from("/opt/keyrank/dict/user_dict.txt"));
    }

    #[test]
    fn test_defaults() {
        let config = KeyrankConfig::new("dict");
        assert_eq!(config.top_k, 20);
        assert!((config.score_floor - 0.1).abs() < f64::EPSILON);
        assert!(config.output_root.is_none());
    }
}
