//! Component DAG built from an SCC decomposition.
//!
//! # Overview
//!
//! Every input edge `u → v` whose endpoints land in different components
//! `cu ≠ cv` becomes the component edge `cu → cv`. Parallel component edges
//! collapse into one and intra-component edges vanish, so the result has no
//! self-edges and no duplicates. Successor sets are ordered ascending.
//!
//! Edges are skipped (and counted) when an endpoint is outside `[0, n)` or
//! belongs to no component. The latter only happens for hand-built
//! [`ComponentSet`]s that do not cover every node.

#![allow(clippy::module_name_repetitions)]

use std::collections::BTreeSet;

use critpath_core::metrics::Metrics;
use critpath_core::model::Graph;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::{debug, instrument};

use crate::graph::scc::ComponentSet;

// ---------------------------------------------------------------------------
// Condensation
// ---------------------------------------------------------------------------

/// The condensation DAG plus the node → component mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condensation {
    components: ComponentSet,
    node_to_component: Vec<Option<usize>>,
    adjacency: Vec<BTreeSet<usize>>,
}

impl Condensation {
    /// Number of components (`k`).
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.adjacency.len()
    }

    /// The decomposition this DAG was built from.
    #[must_use]
    pub const fn components(&self) -> &ComponentSet {
        &self.components
    }

    /// Component of node `node`, if the node is in range and mapped.
    #[must_use]
    pub fn component_of(&self, node: usize) -> Option<usize> {
        self.node_to_component.get(node).copied().flatten()
    }

    /// Deduplicated successors of component `id` in ascending order.
    pub fn successors(&self, id: usize) -> impl Iterator<Item = usize> + '_ {
        self.adjacency.get(id).into_iter().flatten().copied()
    }

    /// Number of distinct component edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(BTreeSet::len).sum()
    }

    /// Member count per component.
    #[must_use]
    pub fn component_sizes(&self) -> Vec<usize> {
        self.components.sizes()
    }

    /// Component in-degrees, indexed by component id.
    #[must_use]
    pub fn in_degrees(&self) -> Vec<usize> {
        let mut indegree = vec![0_usize; self.component_count()];
        for successors in &self.adjacency {
            for &to in successors {
                indegree[to] += 1;
            }
        }
        indegree
    }

    /// Export as a petgraph `DiGraph` whose node weights are the sorted
    /// members and whose `NodeIndex` equals the component id.
    #[must_use]
    pub fn to_petgraph(&self) -> DiGraph<Vec<usize>, ()> {
        let mut graph = DiGraph::with_capacity(self.component_count(), self.edge_count());
        for id in 0..self.component_count() {
            graph.add_node(self.components.sorted_members(id));
        }
        for (from, successors) in self.adjacency.iter().enumerate() {
            for &to in successors {
                graph.add_edge(NodeIndex::new(from), NodeIndex::new(to), ());
            }
        }
        graph
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

/// Build the condensation of `graph` under `components`.
///
/// The graph's `n` sizes the node → component table; component member ids
/// outside `[0, n)` are ignored. When a node is listed in more than one
/// component the later listing wins.
#[must_use]
#[instrument(skip_all, fields(n = graph.node_count(), k = components.len()))]
pub fn build_condensation(
    graph: &Graph,
    components: ComponentSet,
    metrics: &dyn Metrics,
) -> Condensation {
    metrics.start_timer();

    let mut node_to_component = vec![None; graph.node_count()];
    for (id, members) in components.iter().enumerate() {
        for &node in members {
            if let Some(slot) = node_to_component.get_mut(node) {
                *slot = Some(id);
            }
        }
    }

    let mut adjacency = vec![BTreeSet::new(); components.len()];
    let mut skipped = 0_i64;
    for edge in graph.edges() {
        metrics.increment("condensation.edges.processed");

        let endpoints = graph
            .node_index(edge.from)
            .zip(graph.node_index(edge.to))
            .and_then(|(u, v)| node_to_component[u].zip(node_to_component[v]));
        let Some((from, to)) = endpoints else {
            skipped += 1;
            continue;
        };

        if from != to && adjacency[from].insert(to) {
            metrics.increment("condensation.edges.added");
        }
    }
    metrics.increment_by("condensation.edges.skipped", skipped);

    metrics.record_elapsed("condensation.time.nanos");
    debug!(components = adjacency.len(), skipped, "condensation built");

    Condensation {
        components,
        node_to_component,
        adjacency,
    }
}
