//! Immutable task graph model.
//!
//! A [`Graph`] is produced once per dataset (by the parser or the generator)
//! and never mutated afterwards. Node ids are dense (`0..n`), but edges and
//! the source are allowed to reference ids outside that range; consumers
//! check with [`Graph::node_index`] and skip what does not resolve.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How path lengths accumulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightModel {
    /// Sum of member node durations, including the component you start in.
    #[default]
    Node,
    /// Sum of edge weights crossing between components, starting at zero.
    Edge,
}

impl WeightModel {
    /// Stable lowercase name used in datasets and reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Edge => "edge",
        }
    }
}

impl fmt::Display for WeightModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeightModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "node" => Ok(Self::Node),
            "edge" => Ok(Self::Edge),
            other => Err(format!("unknown weight model '{other}' (expected node|edge)")),
        }
    }
}

/// A task. `duration` only matters under [`WeightModel::Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: i64,
    pub duration: Option<u32>,
}

impl Node {
    #[must_use]
    pub const fn new(id: i64, duration: Option<u32>) -> Self {
        Self { id, duration }
    }
}

/// A dependency `from → to`. `weight` only matters under [`WeightModel::Edge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub from: i64,
    pub to: i64,
    pub weight: Option<i32>,
}

impl Edge {
    #[must_use]
    pub const fn new(from: i64, to: i64, weight: Option<i32>) -> Self {
        Self { from, to, weight }
    }

    /// Unweighted edge, convenient for node-model graphs.
    #[must_use]
    pub const fn plain(from: i64, to: i64) -> Self {
        Self::new(from, to, None)
    }
}

/// A directed task graph with an analysis source and weight model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    directed: bool,
    n: usize,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    source: Option<i64>,
    weight_model: WeightModel,
}

impl Graph {
    /// Assemble a graph. No validation happens here: out-of-range edge
    /// endpoints and sources are legal and tolerated downstream.
    #[must_use]
    pub const fn new(
        directed: bool,
        n: usize,
        nodes: Vec<Node>,
        edges: Vec<Edge>,
        source: Option<i64>,
        weight_model: WeightModel,
    ) -> Self {
        Self {
            directed,
            n,
            nodes,
            edges,
            source,
            weight_model,
        }
    }

    /// Directed graph over `0..n` with undated nodes.
    #[must_use]
    pub fn from_edges(n: usize, edges: Vec<Edge>, source: i64, weight_model: WeightModel) -> Self {
        let nodes = (0..n)
            .map(|id| Node::new(i64::try_from(id).unwrap_or(i64::MAX), None))
            .collect();
        Self::new(true, n, nodes, edges, Some(source), weight_model)
    }

    /// Only directed semantics are implemented; the flag is carried through
    /// for reporting.
    #[must_use]
    pub const fn is_directed(&self) -> bool {
        self.directed
    }

    /// Number of nodes (`n`).
    #[must_use]
    pub const fn node_count(&self) -> usize {
        self.n
    }

    /// Number of edges as given, including out-of-range ones.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[must_use]
    pub const fn source(&self) -> Option<i64> {
        self.source
    }

    #[must_use]
    pub const fn weight_model(&self) -> WeightModel {
        self.weight_model
    }

    /// Resolve an id to a dense index, or `None` when it falls outside `[0, n)`.
    #[must_use]
    pub fn node_index(&self, id: i64) -> Option<usize> {
        usize::try_from(id).ok().filter(|&idx| idx < self.n)
    }

    /// Duration per dense node index (missing durations read as 0).
    ///
    /// Node entries with out-of-range ids are ignored; when the same id is
    /// listed twice the later entry wins.
    #[must_use]
    pub fn durations(&self) -> Vec<u64> {
        let mut out = vec![0_u64; self.n];
        for node in &self.nodes {
            if let Some(idx) = self.node_index(node.id) {
                out[idx] = u64::from(node.duration.unwrap_or(0));
            }
        }
        out
    }
}
