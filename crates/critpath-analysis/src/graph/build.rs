//! Adjacency construction from the immutable task graph.
//!
//! # Edge Direction
//!
//! An edge `u → v` means "u must finish before v starts". Successor lists
//! keep the input edge order, duplicates and self-loops included; the SCC
//! search is indifferent to both.
//!
//! ## Out-of-range Edges
//!
//! Edges with an endpoint outside `[0, n)` are dropped here and counted,
//! never reported as errors.

use critpath_core::model::Graph;
use tracing::debug;

/// Successor lists over dense node indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adjacency {
    successors: Vec<Vec<usize>>,
    dropped: usize,
}

impl Adjacency {
    /// Build successor lists from `graph`, skipping out-of-range edges.
    #[must_use]
    pub fn from_graph(graph: &Graph) -> Self {
        let mut successors = vec![Vec::new(); graph.node_count()];
        let mut dropped = 0_usize;

        for edge in graph.edges() {
            match (graph.node_index(edge.from), graph.node_index(edge.to)) {
                (Some(u), Some(v)) => successors[u].push(v),
                _ => dropped += 1,
            }
        }

        if dropped > 0 {
            debug!(dropped, "ignored edges with out-of-range endpoints");
        }

        Self {
            successors,
            dropped,
        }
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.successors.len()
    }

    /// Successors of `node` in input order. Empty for unknown nodes.
    #[must_use]
    pub fn successors(&self, node: usize) -> &[usize] {
        self.successors.get(node).map_or(&[], Vec::as_slice)
    }

    /// Number of input edges skipped for referencing unknown nodes.
    #[must_use]
    pub const fn dropped_edges(&self) -> usize {
        self.dropped
    }
}

/// BLAKE3 fingerprint of a graph's analysis-relevant content.
///
/// Covers `n`, the weight model, the source, per-node durations and the
/// edge list in input order, so two datasets with equal fingerprints yield
/// identical reports.
#[must_use]
pub fn fingerprint(graph: &Graph) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&(graph.node_count() as u64).to_le_bytes());
    hasher.update(graph.weight_model().as_str().as_bytes());
    hasher.update(b"\x00");
    match graph.source() {
        Some(source) => hasher.update(&source.to_le_bytes()),
        None => hasher.update(b"none"),
    };
    for duration in graph.durations() {
        hasher.update(&duration.to_le_bytes());
    }
    for edge in graph.edges() {
        hasher.update(&edge.from.to_le_bytes());
        hasher.update(&edge.to.to_le_bytes());
        hasher.update(&edge.weight.map_or([0xff; 5], |w| {
            let b = w.to_le_bytes();
            [0, b[0], b[1], b[2], b[3]]
        }));
    }
    format!("blake3:{}", hasher.finalize())
}
