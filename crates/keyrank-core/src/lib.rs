//! Keyrank Core: error type, configuration, and the data model shared by
//! every pipeline stage.

pub mod config;
pub mod error;
pub mod feature;
pub mod types;

pub use config::{DictionaryPaths, KeyrankConfig};
pub use error::{Error, Result};
pub use feature::{min_max, normalize, reconcile, FeatureMap, NEUTRAL};
pub use types::*;
