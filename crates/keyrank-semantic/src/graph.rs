//! Relatedness graph over a document's candidate words, using petgraph.

use std::collections::HashMap;

use keyrank_core::CandidateSet;
use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::thesaurus::Thesaurus;

/// Pairs must be strictly more similar than this to be connected.
pub const EDGE_THRESHOLD: f64 = 0.4;

/// Undirected graph whose nodes are words and whose edge weights are
/// `exp(-similarity)`, so closer words are nearer on shortest paths.
///
/// Words without any edge are not nodes.
pub struct RelatednessGraph {
    graph: UnGraph<String, f64>,
    node_index: HashMap<String, NodeIndex>,
    unresolved: Vec<String>,
}

impl RelatednessGraph {
    pub fn new() -> Self {
        Self {
            graph: UnGraph::new_undirected(),
            node_index: HashMap::new(),
            unresolved: Vec::new(),
        }
    }

    /// Compare every candidate pair through the thesaurus.
    pub fn build(candidates: &CandidateSet, thesaurus: &Thesaurus) -> Self {
        let mut graph = Self::new();

        let words: Vec<(&str, &[_])> = candidates
            .words()
            .map(|w| (w, thesaurus.codes_of(w)))
            .collect();

        for (word, codes) in &words {
            if codes.is_empty() {
                graph.unresolved.push(word.to_string());
            }
        }
        if !graph.unresolved.is_empty() {
            warn!(
                "{} of {} candidates not covered by the thesaurus",
                graph.unresolved.len(),
                words.len()
            );
            debug!("Unresolved words: {:?}", graph.unresolved);
        }

        for (i, (a, codes_a)) in words.iter().enumerate() {
            if codes_a.is_empty() {
                continue;
            }
            for (b, codes_b) in &words[i + 1..] {
                if codes_b.is_empty() {
                    continue;
                }
                let sim = crate::similarity::code_similarity(codes_a, codes_b, thesaurus);
                graph.relate(a, b, sim);
            }
        }

        let stats = graph.stats();
        debug!(
            "Relatedness graph: {} nodes, {} edges",
            stats.node_count, stats.edge_count
        );
        graph
    }

    /// Connect `a` and `b` if `similarity` clears the threshold.
    /// Returns whether an edge was added.
    pub fn relate(&mut self, a: &str, b: &str, similarity: f64) -> bool {
        if a == b || similarity <= EDGE_THRESHOLD {
            return false;
        }
        let ia = self.ensure_node(a);
        let ib = self.ensure_node(b);
        self.graph.update_edge(ia, ib, (-similarity).exp());
        true
    }

    fn ensure_node(&mut self, word: &str) -> NodeIndex {
        if let Some(&idx) = self.node_index.get(word) {
            return idx;
        }
        let idx = self.graph.add_node(word.to_string());
        self.node_index.insert(word.to_string(), idx);
        idx
    }

    pub fn contains(&self, word: &str) -> bool {
        self.node_index.contains_key(word)
    }

    pub fn edge_weight(&self, a: &str, b: &str) -> Option<f64> {
        let ia = *self.node_index.get(a)?;
        let ib = *self.node_index.get(b)?;
        let edge = self.graph.find_edge(ia, ib)?;
        self.graph.edge_weight(edge).copied()
    }

    /// Candidates with no thesaurus coverage, in candidate order.
    pub fn unresolved(&self) -> &[String] {
        &self.unresolved
    }

    pub(crate) fn inner(&self) -> &UnGraph<String, f64> {
        &self.graph
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get graph statistics.
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            node_count: self.graph.node_count(),
            edge_count: self.graph.edge_count(),
            unresolved_count: self.unresolved.len(),
        }
    }
}

impl Default for RelatednessGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub unresolved_count: usize,
}
