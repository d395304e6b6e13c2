//! Data types for stage manifests.

use chrono::{DateTime, Utc};
use keyrank_core::Stage;
use serde::{Deserialize, Serialize};

/// File name of a stage's manifest inside its directory.
pub const MANIFEST_FILE: &str = "stage.json";

/// Written last by a stage; its presence marks the stage complete for the
/// document version identified by `source_hash`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageManifest {
    pub stage: Stage,
    /// SHA-256 of the document text the artifacts were computed from.
    pub source_hash: String,
    pub written_at: DateTime<Utc>,
    /// Artifact names present in the stage directory.
    #[serde(default)]
    pub artifacts: Vec<String>,
}

impl StageManifest {
    pub fn new(stage: Stage, source_hash: impl Into<String>, artifacts: Vec<String>) -> Self {
        Self {
            stage,
            source_hash: source_hash.into(),
            written_at: Utc::now(),
            artifacts,
        }
    }
}
