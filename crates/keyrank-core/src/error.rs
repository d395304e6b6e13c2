//! Error types for keyrank.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Document error: {0}")]
    Document(String),

    #[error("Artifact error: {0}")]
    Artifact(String),

    #[error("NLP backend error: {0}")]
    Nlp(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
