//! Single-source shortest and longest paths over the condensation DAG.
//!
//! # Algorithm
//!
//! One forward pass in topological order. Every component starts at the
//! objective's "unreached" sentinel except the source component, which
//! starts at its own weight (node model) or 0 (edge model). Each reached
//! component then relaxes its successors:
//!
//! ```text
//! candidate = distance[u] + step_weight(u, v)
//! shortest: accept when candidate <  distance[v]
//! longest:  accept when candidate >  distance[v]
//! ```
//!
//! Components still at the sentinel are skipped entirely.
//!
//! # Sentinels
//!
//! Sentinels are large finite values, not infinities: `i64::MAX / 4` for
//! shortest and `i64::MIN / 4` for longest. A distance counts as finite when
//! `|d| < i64::MAX / 8`.

#![allow(clippy::module_name_repetitions)]

use critpath_core::error::AnalysisError;
use critpath_core::metrics::Metrics;
use critpath_core::model::Graph;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::graph::condensation::Condensation;
use crate::graph::topo::TopoOrder;
use crate::paths::weights::ComponentWeights;

/// "Unreached" distance for shortest paths.
pub const UNREACHED_SHORTEST: i64 = i64::MAX / 4;
/// "Unreached" distance for longest paths.
pub const UNREACHED_LONGEST: i64 = i64::MIN / 4;
/// Distances with a magnitude at or above this are treated as unreached.
pub const FINITE_BOUND: i64 = i64::MAX / 8;

/// `true` when `distance` is a real path length rather than a sentinel.
#[must_use]
pub const fn is_finite(distance: i64) -> bool {
    distance > -FINITE_BOUND && distance < FINITE_BOUND
}

// ---------------------------------------------------------------------------
// Objective
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Objective {
    Shortest,
    Longest,
}

impl Objective {
    #[must_use]
    pub const fn unreached(self) -> i64 {
        match self {
            Self::Shortest => UNREACHED_SHORTEST,
            Self::Longest => UNREACHED_LONGEST,
        }
    }

    /// Strict comparison: equal candidates never replace a parent.
    #[must_use]
    pub const fn improves(self, candidate: i64, current: i64) -> bool {
        match self {
            Self::Shortest => candidate < current,
            Self::Longest => candidate > current,
        }
    }

    const fn timer_key(self) -> &'static str {
        match self {
            Self::Shortest => "dag.shortest.time.nanos",
            Self::Longest => "dag.longest.time.nanos",
        }
    }
}

// ---------------------------------------------------------------------------
// PathResult
// ---------------------------------------------------------------------------

/// Relaxation counters of one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RelaxationStats {
    pub attempted: u64,
    pub succeeded: u64,
}

impl RelaxationStats {
    #[must_use]
    pub const fn combined(self, other: Self) -> Self {
        Self {
            attempted: self.attempted + other.attempted,
            succeeded: self.succeeded + other.succeeded,
        }
    }
}

/// Distances and parent pointers for every component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResult {
    pub objective: Objective,
    /// Indexed by component id; unreached components hold the sentinel.
    pub distance: Vec<i64>,
    /// `None` for the source component and for anything never updated.
    pub parent: Vec<Option<usize>>,
    pub source_component: usize,
    pub stats: RelaxationStats,
}

impl PathResult {
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.distance.len()
    }

    /// Distance to `component`, or `None` when unreached or out of range.
    #[must_use]
    pub fn finite_distance(&self, component: usize) -> Option<i64> {
        self.distance
            .get(component)
            .copied()
            .filter(|&d| is_finite(d))
    }

    #[must_use]
    pub fn is_reached(&self, component: usize) -> bool {
        self.finite_distance(component).is_some()
    }

    /// Distances with sentinels replaced by `None`.
    #[must_use]
    pub fn finite_distances(&self) -> Vec<Option<i64>> {
        (0..self.component_count())
            .map(|c| self.finite_distance(c))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// PathEngine
// ---------------------------------------------------------------------------

/// Shared setup for both passes: validated source and weight tables.
#[derive(Debug)]
pub struct PathEngine<'a> {
    condensation: &'a Condensation,
    topo: &'a TopoOrder,
    weights: ComponentWeights,
    source_component: usize,
}

impl<'a> PathEngine<'a> {
    /// Validate the graph's source and precompute weights.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::MissingSource`] when the graph declares no source.
    /// - [`AnalysisError::InvalidSource`] when the source is outside `[0, n)`.
    /// - [`AnalysisError::UnmappedSource`] when no component contains it.
    pub fn new(
        graph: &Graph,
        condensation: &'a Condensation,
        topo: &'a TopoOrder,
    ) -> Result<Self, AnalysisError> {
        let source_component = resolve_source(graph, condensation)?;
        Ok(Self {
            condensation,
            topo,
            weights: ComponentWeights::build(graph, condensation),
            source_component,
        })
    }

    #[must_use]
    pub const fn source_component(&self) -> usize {
        self.source_component
    }

    #[must_use]
    pub fn shortest(&self, metrics: &dyn Metrics) -> PathResult {
        self.run(Objective::Shortest, metrics)
    }

    #[must_use]
    pub fn longest(&self, metrics: &dyn Metrics) -> PathResult {
        self.run(Objective::Longest, metrics)
    }

    /// One forward relaxation pass for `objective`.
    #[must_use]
    #[instrument(skip_all, fields(objective = ?objective, source = self.source_component))]
    pub fn run(&self, objective: Objective, metrics: &dyn Metrics) -> PathResult {
        metrics.start_timer();

        let k = self.condensation.component_count();
        let unreached = objective.unreached();
        let mut distance = vec![unreached; k];
        let mut parent = vec![None; k];
        let mut stats = RelaxationStats::default();

        distance[self.source_component] = self.weights.source_weight(self.source_component);

        for &u in &self.topo.component_order {
            if distance[u] == unreached {
                continue;
            }
            for v in self.condensation.successors(u) {
                stats.attempted += 1;
                metrics.increment("dag.relaxations.attempted");

                let candidate = distance[u].saturating_add(self.weights.step_weight(u, v));
                if objective.improves(candidate, distance[v]) {
                    distance[v] = candidate;
                    parent[v] = Some(u);
                    stats.succeeded += 1;
                    metrics.increment("dag.relaxations.succeeded");
                }
            }
        }

        metrics.record_elapsed(objective.timer_key());
        debug!(
            attempted = stats.attempted,
            succeeded = stats.succeeded,
            "relaxation pass complete"
        );

        PathResult {
            objective,
            distance,
            parent,
            source_component: self.source_component,
            stats,
        }
    }
}

/// Map the graph's source node to its component.
///
/// # Errors
///
/// See [`PathEngine::new`].
pub fn resolve_source(graph: &Graph, condensation: &Condensation) -> Result<usize, AnalysisError> {
    let source = graph.source().ok_or(AnalysisError::MissingSource)?;
    let node = graph
        .node_index(source)
        .ok_or(AnalysisError::InvalidSource {
            node: source,
            node_count: graph.node_count(),
        })?;
    condensation
        .component_of(node)
        .ok_or(AnalysisError::UnmappedSource { node })
}

/// Shortest distances from the graph's source.
///
/// # Errors
///
/// Fails on an invalid source; see [`PathEngine::new`].
pub fn shortest_paths(
    graph: &Graph,
    condensation: &Condensation,
    topo: &TopoOrder,
    metrics: &dyn Metrics,
) -> Result<PathResult, AnalysisError> {
    Ok(PathEngine::new(graph, condensation, topo)?.shortest(metrics))
}

/// Longest (critical) distances from the graph's source.
///
/// # Errors
///
/// Fails on an invalid source; see [`PathEngine::new`].
pub fn longest_paths(
    graph: &Graph,
    condensation: &Condensation,
    topo: &TopoOrder,
    metrics: &dyn Metrics,
) -> Result<PathResult, AnalysisError> {
    Ok(PathEngine::new(graph, condensation, topo)?.longest(metrics))
}
