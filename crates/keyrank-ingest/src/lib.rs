//! Keyrank Ingest: document reading, sentence splitting, stop words,
//! segmentation/tagging backends and preprocessing.

pub mod document;
pub mod nlp;
pub mod preprocess;
pub mod sentences;
pub mod stopwords;

pub use document::{content_hash, read_document, Document};
pub use nlp::{create_backend, BackendKind, JiebaBackend, NlpBackend, PretaggedBackend, TaggedToken};
pub use preprocess::{PreprocessOutput, Preprocessor, SentenceContext};
pub use sentences::{split_sentences, SENTENCE_DELIMITERS};
pub use stopwords::StopWords;
