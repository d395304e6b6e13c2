//! Keyrank Score: statistical features and the composite scorer.
//!
//! Density comes from the semantic stage; TF-IDF, position and
//! part-of-speech are computed here. All four are min-max normalized over
//! the candidate set before they are fused.

pub mod features;
pub mod keyphrase;
pub mod scorer;
pub mod types;

pub use features::{length_feature, pos_feature, pos_weight, position_feature, tfidf_feature};
pub use keyphrase::extract_keyphrases;
pub use scorer::{rank, score_word, select_keywords};
pub use types::*;
