//! Keyrank Store: per-document stage artifacts on the local filesystem.

pub mod artifacts;
pub mod text;
pub mod types;

pub use artifacts::{ArtifactStore, CurrentArtifacts};
pub use text::{candidates_text, feature_text, lines, tab_lines};
pub use types::*;
