//! Weighted betweenness centrality ("semantic density").
//!
//! Brandes' algorithm with Dijkstra shortest paths. Edge weights are
//! `exp(-similarity)`, so a word that sits on many short paths between
//! related words scores high.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use keyrank_core::{normalize, CandidateSet, FeatureMap, NEUTRAL};
use petgraph::visit::EdgeRef;
use tracing::debug;

use crate::graph::RelatednessGraph;

/// Path lengths closer than this are considered equal.
const PATH_EPSILON: f64 = 1e-12;

/// Entry in the Dijkstra frontier, ordered by distance then node.
struct HeapEntry {
    dist: f64,
    node: usize,
}

impl Eq for HeapEntry {}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dist
            .total_cmp(&other.dist)
            .then_with(|| self.node.cmp(&other.node))
    }
}

/// Raw betweenness per node index. Each unordered pair of endpoints is
/// counted once.
pub fn betweenness(graph: &RelatednessGraph) -> Vec<f64> {
    let inner = graph.inner();
    let n = inner.node_count();

    let mut adjacency: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n];
    for edge in inner.edge_references() {
        let (a, b) = (edge.source().index(), edge.target().index());
        adjacency[a].push((b, *edge.weight()));
        adjacency[b].push((a, *edge.weight()));
    }

    let mut centrality = vec![0.0; n];
    for source in 0..n {
        let mut order = Vec::with_capacity(n);
        let mut preds: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut sigma = vec![0.0_f64; n];
        let mut dist: Vec<Option<f64>> = vec![None; n];
        let mut settled = vec![false; n];
        let mut heap = BinaryHeap::new();

        sigma[source] = 1.0;
        dist[source] = Some(0.0);
        heap.push(Reverse(HeapEntry { dist: 0.0, node: source }));

        while let Some(Reverse(HeapEntry { dist: d, node: v })) = heap.pop() {
            if settled[v] {
                continue;
            }
            settled[v] = true;
            order.push(v);

            for &(w, weight) in &adjacency[v] {
                if settled[w] {
                    continue;
                }
                let through_v = d + weight;
                match dist[w] {
                    Some(current) if (through_v - current).abs() <= PATH_EPSILON => {
                        sigma[w] += sigma[v];
                        preds[w].push(v);
                    }
                    Some(current) if through_v > current => {}
                    _ => {
                        dist[w] = Some(through_v);
                        sigma[w] = sigma[v];
                        preds[w] = vec![v];
                        heap.push(Reverse(HeapEntry { dist: through_v, node: w }));
                    }
                }
            }
        }

        let mut delta = vec![0.0_f64; n];
        while let Some(w) = order.pop() {
            for &v in &preds[w] {
                delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
            }
            if w != source {
                centrality[w] += delta[w];
            }
        }
    }

    for value in &mut centrality {
        *value /= 2.0;
    }
    centrality
}

/// Normalized density for every candidate.
///
/// Candidates outside the graph take the smallest raw value before
/// normalization. With fewer than two nodes there is nothing to measure and
/// every candidate gets [`NEUTRAL`].
pub fn compute_density(graph: &RelatednessGraph, candidates: &CandidateSet) -> FeatureMap {
    if graph.node_count() < 2 {
        debug!("Graph has {} nodes, density is neutral", graph.node_count());
        return candidates.words().map(|w| (w.to_string(), NEUTRAL)).collect();
    }

    let scores = betweenness(graph);
    let inner = graph.inner();
    let raw: FeatureMap = inner
        .node_indices()
        .map(|idx| (inner[idx].clone(), scores[idx.index()]))
        .collect();
    let floor = scores.iter().copied().fold(f64::INFINITY, f64::min);

    let filled: FeatureMap = candidates
        .words()
        .map(|w| (w.to_string(), raw.get(w).copied().unwrap_or(floor)))
        .collect();
    normalize(candidates, &filled)
}
