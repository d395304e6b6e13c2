//! Runtime types.

use std::path::PathBuf;

use keyrank_core::Stage;
use keyrank_score::ScoredWord;
use serde::Serialize;

/// Result of running one stage on one document.
#[derive(Debug, Clone, Serialize)]
pub struct StageReport {
    pub stage: Stage,
    /// Candidates the stage worked on (after merging, for the semantic stage).
    #[serde(rename = "candidateCount")]
    pub candidate_count: usize,
    /// Artifact names written.
    pub artifacts: Vec<String>,
    #[serde(rename = "durationMs")]
    pub duration_ms: u64,
}

/// Result of running every stage on one document.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    pub path: PathBuf,
    #[serde(rename = "outputDir")]
    pub output_dir: PathBuf,
    pub stages: Vec<StageReport>,
    pub keywords: Vec<ScoredWord>,
    pub keyphrases: Vec<ScoredWord>,
}

/// A document whose run failed.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Result of running a batch of documents.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub documents: Vec<DocumentReport>,
    pub failures: Vec<DocumentFailure>,
    #[serde(rename = "durationMs")]
    pub duration_ms: u64,
}
