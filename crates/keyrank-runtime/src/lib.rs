//! Keyrank Runtime: staged keyword-extraction pipeline.
//!
//! Runs preprocess → semantic → statistical → scoring for each document,
//! handing data from stage to stage through the artifact store so that any
//! stage can be re-run on its own.

pub mod orchestrator;
pub mod types;

pub use orchestrator::Pipeline;
pub use types::*;
