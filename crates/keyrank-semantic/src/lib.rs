//! Keyrank Semantic: thesaurus similarity, relatedness graph, betweenness
//! density and collocation merging.
//!
//! The `Thesaurus` is built once and shared read-only; everything else is
//! computed per document.

pub mod centrality;
pub mod collocation;
pub mod graph;
pub mod similarity;
pub mod thesaurus;

pub use centrality::{betweenness, compute_density};
pub use collocation::{merge_collocations, MIN_RATIO, MIN_SUPPORT};
pub use graph::{GraphStats, RelatednessGraph, EDGE_THRESHOLD};
pub use similarity::{code_similarity, pair_similarity, shared_prefix_len, sibling_distance};
pub use thesaurus::{SenseCode, Thesaurus};
