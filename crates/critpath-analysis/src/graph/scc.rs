//! Strongly connected components via the single-pass low-link search.
//!
//! # Algorithm
//!
//! Tarjan's algorithm over [`Adjacency`], with the recursion replaced by an
//! explicit heap-allocated stack of `(node, next successor position)` frames
//! so chain graphs of any length are safe.
//!
//! 1. Roots are tried in ascending node order; each undiscovered one starts
//!    a search.
//! 2. Discovering a node assigns it the next discovery time, sets its
//!    low-link to the same value and pushes it on the component stack.
//! 3. A tree edge folds the child's low-link into the parent once the child
//!    is finished; an edge to a node still on the component stack folds that
//!    node's discovery time.
//! 4. A finished node whose low-link equals its discovery time is a root:
//!    the component stack is popped down to it and the popped nodes form
//!    one component.
//!
//! Components are numbered in the order their roots close, which is a
//! reverse topological order of the condensation. Members keep pop order;
//! consumers that need a stable member order sort.

use critpath_core::metrics::Metrics;
use critpath_core::model::Graph;
use fixedbitset::FixedBitSet;
use tracing::{debug, instrument};

use crate::graph::build::Adjacency;

/// Partition of `0..n` into strongly connected components.
///
/// Component id = position in the list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComponentSet {
    components: Vec<Vec<usize>>,
}

impl ComponentSet {
    /// Wrap an explicit component list (e.g. one computed elsewhere).
    ///
    /// No validation happens; the condensation stage tolerates node ids it
    /// cannot place and the topological sort rejects decompositions that
    /// leave cycles behind.
    #[must_use]
    pub const fn new(components: Vec<Vec<usize>>) -> Self {
        Self { components }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Members of component `id`, in discovery pop order.
    #[must_use]
    pub fn members(&self, id: usize) -> Option<&[usize]> {
        self.components.get(id).map(Vec::as_slice)
    }

    /// Members of component `id` in ascending order.
    #[must_use]
    pub fn sorted_members(&self, id: usize) -> Vec<usize> {
        let mut members = self.members(id).map(<[usize]>::to_vec).unwrap_or_default();
        members.sort_unstable();
        members
    }

    pub fn iter(&self) -> impl Iterator<Item = &[usize]> {
        self.components.iter().map(Vec::as_slice)
    }

    /// Member count per component.
    #[must_use]
    pub fn sizes(&self) -> Vec<usize> {
        self.components.iter().map(Vec::len).collect()
    }
}

const UNVISITED: usize = usize::MAX;

struct LowLinkSearch<'a> {
    adjacency: &'a Adjacency,
    metrics: &'a dyn Metrics,
    discovery: Vec<usize>,
    low_link: Vec<usize>,
    on_stack: FixedBitSet,
    stack: Vec<usize>,
    frames: Vec<(usize, usize)>,
    time: usize,
    components: Vec<Vec<usize>>,
}

impl<'a> LowLinkSearch<'a> {
    fn new(adjacency: &'a Adjacency, metrics: &'a dyn Metrics) -> Self {
        let n = adjacency.node_count();
        Self {
            adjacency,
            metrics,
            discovery: vec![UNVISITED; n],
            low_link: vec![UNVISITED; n],
            on_stack: FixedBitSet::with_capacity(n),
            stack: Vec::new(),
            frames: Vec::new(),
            time: 0,
            components: Vec::new(),
        }
    }

    fn discover(&mut self, node: usize) {
        self.discovery[node] = self.time;
        self.low_link[node] = self.time;
        self.time += 1;
        self.metrics.increment("scc.dfs.visits");

        self.stack.push(node);
        self.on_stack.insert(node);
        self.metrics.increment("scc.stack.push");

        self.frames.push((node, 0));
    }

    fn run_from(&mut self, root: usize) {
        self.discover(root);

        while let Some(&(node, position)) = self.frames.last() {
            let successors = self.adjacency.successors(node);

            if let Some(&next) = successors.get(position) {
                if let Some(frame) = self.frames.last_mut() {
                    frame.1 = position + 1;
                }
                self.metrics.increment("scc.dfs.edges");

                if self.discovery[next] == UNVISITED {
                    self.discover(next);
                } else if self.on_stack.contains(next) {
                    self.low_link[node] = self.low_link[node].min(self.discovery[next]);
                }
                continue;
            }

            // All successors handled: close the node.
            self.frames.pop();
            if self.low_link[node] == self.discovery[node] {
                self.pop_component(node);
            }
            if let Some(&(parent, _)) = self.frames.last() {
                self.low_link[parent] = self.low_link[parent].min(self.low_link[node]);
            }
        }
    }

    fn pop_component(&mut self, root: usize) {
        let mut component = Vec::new();
        while let Some(member) = self.stack.pop() {
            self.metrics.increment("scc.stack.pop");
            self.on_stack.set(member, false);
            component.push(member);
            if member == root {
                break;
            }
        }
        self.components.push(component);
    }
}

/// Compute the strongly connected components of `graph`.
///
/// Runs in O(n + m) time and space. Out-of-range edges are ignored, and
/// self-loops and parallel edges do not affect the result. `n = 0` yields
/// an empty set.
#[must_use]
#[instrument(skip_all, fields(n = graph.node_count(), m = graph.edge_count()))]
pub fn find_sccs(graph: &Graph, metrics: &dyn Metrics) -> ComponentSet {
    metrics.start_timer();

    let adjacency = Adjacency::from_graph(graph);
    metrics.increment_by(
        "scc.edges.dropped",
        i64::try_from(adjacency.dropped_edges()).unwrap_or(i64::MAX),
    );

    let mut search = LowLinkSearch::new(&adjacency, metrics);
    for root in 0..adjacency.node_count() {
        if search.discovery[root] == UNVISITED {
            search.run_from(root);
        }
    }
    let components = search.components;

    metrics.record_elapsed("scc.time.nanos");
    debug!(components = components.len(), "scc search complete");

    ComponentSet::new(components)
}
