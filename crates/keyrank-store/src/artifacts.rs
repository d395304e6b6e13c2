//! Stage artifact directory for one document.
//!
//! Layout: `<root>/<stage>/<NAME>.json` holding `{"NAME": value}`, a
//! `<NAME>.txt` rendering next to it, and the stage manifest. Files are
//! written to a temporary file in the same directory and renamed into place.

use std::io::Write;
use std::path::{Path, PathBuf};

use keyrank_core::{CandidateSet, CandidateWord, Error, FeatureMap, Result, Stage};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::types::{StageManifest, MANIFEST_FILE};

/// Artifact directory of a single document.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Use `root` as the artifact directory. Nothing is created until the
    /// first write.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `<stem>_output` next to the document, or under `output_root` when given.
    pub fn for_document(doc_path: &Path, output_root: Option<&Path>) -> Self {
        let stem = doc_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        let parent = output_root
            .map(Path::to_path_buf)
            .or_else(|| doc_path.parent().map(Path::to_path_buf))
            .unwrap_or_default();
        Self::open(parent.join(format!("{}_output", stem)))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn stage_dir(&self, stage: Stage) -> PathBuf {
        self.root.join(stage.as_str())
    }

    fn json_path(&self, stage: Stage, name: &str) -> PathBuf {
        self.stage_dir(stage).join(format!("{}.json", name))
    }

    fn text_path(&self, stage: Stage, name: &str) -> PathBuf {
        self.stage_dir(stage).join(format!("{}.txt", name))
    }

    /// Write both forms of an artifact.
    pub fn write<T: Serialize>(&self, stage: Stage, name: &str, value: &T, text: &str) -> Result<()> {
        let dir = self.stage_dir(stage);
        std::fs::create_dir_all(&dir)
            .map_err(|e| Error::Artifact(format!("{}: {}", dir.display(), e)))?;

        let mut tagged = serde_json::Map::new();
        tagged.insert(name.to_string(), serde_json::to_value(value)?);
        let json = serde_json::to_vec_pretty(&Value::Object(tagged))?;

        write_atomic(&self.json_path(stage, name), &json)?;
        write_atomic(&self.text_path(stage, name), text.as_bytes())?;
        debug!("Wrote {}/{}", stage, name);
        Ok(())
    }

    /// The value stored under `name`, or `None` when the artifact is absent
    /// or unreadable.
    pub fn read_value(&self, stage: Stage, name: &str) -> Option<Value> {
        let path = self.json_path(stage, name);
        let bytes = match std::fs::read(&path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Missing artifact {}", path.display());
                return None;
            }
            Err(e) => {
                warn!("Unreadable artifact {}: {}", path.display(), e);
                return None;
            }
        };

        let mut parsed: Value = match serde_json::from_slice(&bytes) {
            Ok(v) => v,
            Err(e) => {
                warn!("Corrupt artifact {}: {}", path.display(), e);
                return None;
            }
        };
        match parsed.get_mut(name).map(Value::take) {
            Some(value) => Some(value),
            None => {
                warn!("Artifact {} has no {:?} entry", path.display(), name);
                None
            }
        }
    }

    /// Deserialize an artifact as a whole; a shape mismatch counts as missing.
    pub fn read<T: DeserializeOwned>(&self, stage: Stage, name: &str) -> Option<T> {
        let value = self.read_value(stage, name)?;
        match serde_json::from_value(value) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!("Artifact {}/{} has an unexpected shape: {}", stage, name, e);
                None
            }
        }
    }

    /// Read a word → number map. Numeric strings are accepted; any other
    /// entry is dropped.
    pub fn read_feature_map(&self, stage: Stage, name: &str) -> FeatureMap {
        let Some(value) = self.read_value(stage, name) else {
            return FeatureMap::new();
        };
        let Value::Object(entries) = value else {
            warn!("Artifact {}/{} is not a map", stage, name);
            return FeatureMap::new();
        };

        let mut map = FeatureMap::new();
        let mut dropped = 0usize;
        for (word, raw) in entries {
            match coerce_number(&raw) {
                Some(v) => {
                    map.insert(word, v);
                }
                None => {
                    debug!("Dropping {}/{} entry {:?}: {}", stage, name, word, raw);
                    dropped += 1;
                }
            }
        }
        if dropped > 0 {
            warn!("Dropped {} non-numeric entries from {}/{}", dropped, stage, name);
        }
        map
    }

    /// Read a candidate list entry by entry, skipping malformed entries.
    pub fn read_candidates(&self, stage: Stage, name: &str) -> CandidateSet {
        let Some(value) = self.read_value(stage, name) else {
            return CandidateSet::new();
        };
        let Value::Array(entries) = value else {
            warn!("Artifact {}/{} is not a list", stage, name);
            return CandidateSet::new();
        };

        let mut set = CandidateSet::new();
        for entry in entries {
            match serde_json::from_value::<CandidateWord>(entry) {
                Ok(candidate) => {
                    set.insert(candidate);
                }
                Err(e) => warn!("Skipping malformed candidate in {}/{}: {}", stage, name, e),
            }
        }
        set
    }

    /// The text form of an artifact.
    pub fn read_text(&self, stage: Stage, name: &str) -> Option<String> {
        std::fs::read_to_string(self.text_path(stage, name)).ok()
    }

    /// Record that `stage` finished for the document version `source_hash`.
    pub fn mark_complete(&self, stage: Stage, source_hash: &str, artifacts: &[&str]) -> Result<()> {
        let manifest = StageManifest::new(
            stage,
            source_hash,
            artifacts.iter().map(|a| a.to_string()).collect(),
        );
        let dir = self.stage_dir(stage);
        std::fs::create_dir_all(&dir)
            .map_err(|e| Error::Artifact(format!("{}: {}", dir.display(), e)))?;
        write_atomic(&dir.join(MANIFEST_FILE), &serde_json::to_vec_pretty(&manifest)?)
    }

    pub fn manifest(&self, stage: Stage) -> Option<StageManifest> {
        let bytes = std::fs::read(self.stage_dir(stage).join(MANIFEST_FILE)).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    /// Whether `stage` has completed for this exact document version.
    pub fn is_complete(&self, stage: Stage, source_hash: &str) -> bool {
        self.manifest(stage)
            .map(|m| m.stage == stage && m.source_hash == source_hash)
            .unwrap_or(false)
    }

    /// Reader that only trusts stages completed for `source_hash`.
    pub fn current<'a>(&'a self, source_hash: &'a str) -> CurrentArtifacts<'a> {
        CurrentArtifacts {
            store: self,
            source_hash,
        }
    }

    /// Forget that `stage` completed. Artifacts stay until overwritten.
    pub fn clear_stage(&self, stage: Stage) -> Result<()> {
        let path = self.stage_dir(stage).join(MANIFEST_FILE);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Artifact(format!("{}: {}", path.display(), e))),
        }
    }
}

/// Artifacts of one document version.
///
/// A stage whose manifest is missing or records another content hash reads
/// as empty, so output of an aborted or outdated run never feeds the next
/// stage.
#[derive(Debug, Clone, Copy)]
pub struct CurrentArtifacts<'a> {
    store: &'a ArtifactStore,
    source_hash: &'a str,
}

impl<'a> CurrentArtifacts<'a> {
    pub fn source_hash(&self) -> &str {
        self.source_hash
    }

    /// Whether `stage` completed for this document version.
    pub fn is_current(&self, stage: Stage) -> bool {
        let current = self.store.is_complete(stage, self.source_hash);
        if !current {
            debug!("Ignoring {} artifacts from another document version", stage);
        }
        current
    }

    pub fn read<T: DeserializeOwned>(&self, stage: Stage, name: &str) -> Option<T> {
        if !self.is_current(stage) {
            return None;
        }
        self.store.read(stage, name)
    }

    pub fn read_feature_map(&self, stage: Stage, name: &str) -> FeatureMap {
        if !self.is_current(stage) {
            return FeatureMap::new();
        }
        self.store.read_feature_map(stage, name)
    }

    pub fn read_candidates(&self, stage: Stage, name: &str) -> CandidateSet {
        if !self.is_current(stage) {
            return CandidateSet::new();
        }
        self.store.read_candidates(stage, name)
    }
}

/// Numbers as-is; strings that parse as finite numbers.
fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| Error::Artifact(format!("{}: no parent directory", path.display())))?;
    let mut temp = NamedTempFile::new_in(dir)
        .map_err(|e| Error::Artifact(format!("{}: {}", dir.display(), e)))?;
    temp.write_all(contents)?;
    temp.persist(path)
        .map_err(|e| Error::Artifact(format!("{}: {}", path.display(), e.error)))?;
    Ok(())
}
