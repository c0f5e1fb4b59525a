//! Per-dataset analysis: the full chain plus target selection, packaged as
//! one immutable report.
//!
//! ```text
//! Graph → find_sccs → build_condensation → topological_order
//!       → PathEngine (shortest, longest) → TargetSelector → DatasetReport
//! ```
//!
//! Either the whole report is produced or an [`AnalysisError`] is returned;
//! there is no partial output.

use std::time::Instant;

use critpath_core::config::ShortestTarget;
use critpath_core::error::AnalysisError;
use critpath_core::metrics::Metrics;
use critpath_core::model::{Graph, WeightModel};
use critpath_core::timing;
use serde::Serialize;
use tracing::{info, instrument};

use crate::graph::{
    CondensationStats, Condensation, TopoOrder, build_condensation, find_sccs, fingerprint,
    topological_order,
};
use crate::paths::{
    FarthestReachable, MaxDistance, NearestReachable, PathEngine, PathResult, RelaxationStats,
    TargetSelector, expand_to_node_path, reconstruct_component_path,
};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Policy for the reported shortest-path target.
    pub shortest_target: ShortestTarget,
    /// When false, stage timings in the report are zero.
    pub include_timings: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            shortest_target: ShortestTarget::Farthest,
            include_timings: true,
        }
    }
}

impl AnalysisOptions {
    fn shortest_selector(&self) -> &'static dyn TargetSelector {
        match self.shortest_target {
            ShortestTarget::Farthest => &FarthestReachable,
            ShortestTarget::Nearest => &NearestReachable,
        }
    }
}

// ---------------------------------------------------------------------------
// Chain
// ---------------------------------------------------------------------------

/// Wall-clock nanoseconds spent in each stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StageTimings {
    pub scc_ns: u64,
    pub condensation_ns: u64,
    pub topo_ns: u64,
    pub dag_ns: u64,
}

/// Raw outputs of every stage for one graph.
#[derive(Debug, Clone)]
pub struct ChainOutput {
    pub condensation: Condensation,
    pub topo: TopoOrder,
    pub shortest: PathResult,
    pub longest: PathResult,
    pub stats: CondensationStats,
    pub timings: StageTimings,
}

/// Run SCC → condensation → topological order → both path passes.
///
/// # Errors
///
/// - [`AnalysisError::CycleInCondensation`] on an inconsistent condensation.
/// - Source validation errors from [`PathEngine::new`].
#[instrument(skip_all, fields(n = graph.node_count(), m = graph.edge_count()))]
pub fn run_chain(graph: &Graph, metrics: &dyn Metrics) -> Result<ChainOutput, AnalysisError> {
    let mut timings = StageTimings::default();

    let components = stage(&mut timings.scc_ns, "scc", || find_sccs(graph, metrics));
    let condensation = stage(&mut timings.condensation_ns, "condensation", || {
        build_condensation(graph, components, metrics)
    });
    let topo = stage(&mut timings.topo_ns, "topo", || {
        topological_order(&condensation, metrics)
    })?;

    let (shortest, longest) = stage(&mut timings.dag_ns, "dag", || {
        let engine = PathEngine::new(graph, &condensation, &topo)?;
        Ok::<_, AnalysisError>((engine.shortest(metrics), engine.longest(metrics)))
    })?;

    let stats = CondensationStats::from_condensation(graph, &condensation);

    Ok(ChainOutput {
        condensation,
        topo,
        shortest,
        longest,
        stats,
        timings,
    })
}

fn stage<R>(slot: &mut u64, name: &str, f: impl FnOnce() -> R) -> R {
    let started = Instant::now();
    let result = timing::timed(name, f);
    *slot = u64::try_from(started.elapsed().as_nanos()).unwrap_or(u64::MAX);
    result
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// A reported path: component ids, expanded node ids and its length.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PathSummary {
    pub component_ids: Vec<usize>,
    pub node_ids: Vec<usize>,
    /// `None` when no path to a selected target exists.
    pub length: Option<i64>,
}

impl PathSummary {
    fn build(chain: &ChainOutput, result: &PathResult, target: Option<usize>) -> Self {
        let component_ids = target
            .map(|t| reconstruct_component_path(result, t))
            .unwrap_or_default();
        if component_ids.is_empty() {
            return Self::default();
        }

        let node_ids = expand_to_node_path(chain.condensation.components(), &component_ids);
        Self {
            length: target.and_then(|t| result.finite_distance(t)),
            component_ids,
            node_ids,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.component_ids.is_empty()
    }
}

/// Everything reported for one dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetReport {
    pub n: usize,
    pub m: usize,
    pub directed: bool,
    pub weight_model: WeightModel,
    pub source_component: usize,
    pub scc_count: usize,
    pub scc_sizes: Vec<usize>,
    pub component_order: Vec<usize>,
    pub derived_task_order: Vec<usize>,
    pub critical_path: PathSummary,
    pub shortest_path: PathSummary,
    /// Shortest distance per component; unreached components are `null`.
    pub shortest_distances_component: Vec<Option<i64>>,
    pub relaxations: RelaxationStats,
    pub condensation: CondensationStats,
    pub timings: StageTimings,
    pub graph_fingerprint: String,
}

/// Analyse one graph end to end.
///
/// # Errors
///
/// See [`run_chain`].
#[instrument(skip_all, fields(n = graph.node_count(), m = graph.edge_count()))]
pub fn analyze(
    graph: &Graph,
    options: &AnalysisOptions,
    metrics: &dyn Metrics,
) -> Result<DatasetReport, AnalysisError> {
    let chain = run_chain(graph, metrics)?;

    let critical_target = MaxDistance.select(&chain.longest);
    let shortest_target = options.shortest_selector().select(&chain.shortest);
    let critical_path = PathSummary::build(&chain, &chain.longest, critical_target);
    let shortest_path = PathSummary::build(&chain, &chain.shortest, shortest_target);

    let report = DatasetReport {
        n: graph.node_count(),
        m: graph.edge_count(),
        directed: graph.is_directed(),
        weight_model: graph.weight_model(),
        source_component: chain.shortest.source_component,
        scc_count: chain.condensation.component_count(),
        scc_sizes: chain.condensation.component_sizes(),
        component_order: chain.topo.component_order.clone(),
        derived_task_order: chain.topo.node_order.clone(),
        critical_path,
        shortest_path,
        shortest_distances_component: chain.shortest.finite_distances(),
        relaxations: chain.shortest.stats.combined(chain.longest.stats),
        condensation: chain.stats,
        timings: if options.include_timings {
            chain.timings
        } else {
            StageTimings::default()
        },
        graph_fingerprint: fingerprint(graph),
    };

    info!(
        scc_count = report.scc_count,
        critical_length = report.critical_path.length,
        shortest_length = report.shortest_path.length,
        "dataset analysed"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use critpath_core::metrics::{NoopMetrics, SimpleMetrics};
    use critpath_core::model::{Edge, Node};

    fn deterministic() -> AnalysisOptions {
        AnalysisOptions {
            include_timings: false,
            ..AnalysisOptions::default()
        }
    }

    #[test]
    fn chain_report_matches_hand_computation() {
        let g = Graph::new(
            true,
            3,
            vec![Node::new(0, Some(2)), Node::new(1, Some(3)), Node::new(2, Some(4))],
            vec![Edge::plain(0, 1), Edge::plain(1, 2)],
            Some(0),
            WeightModel::Node,
        );
        let report = analyze(&g, &deterministic(), &NoopMetrics).expect("analyze");

        assert_eq!(report.scc_count, 3);
        assert_eq!(report.derived_task_order, vec![0, 1, 2]);
        assert_eq!(report.critical_path.node_ids, vec![0, 1, 2]);
        assert_eq!(report.critical_path.length, Some(9));
        assert_eq!(report.shortest_path.node_ids, vec![0, 1, 2]);
        assert_eq!(report.shortest_path.length, Some(9));
        assert_eq!(report.relaxations, RelaxationStats { attempted: 4, succeeded: 4 });
        assert_eq!(report.timings, StageTimings::default());
    }

    #[test]
    fn isolated_source_reports_itself() {
        let g = Graph::from_edges(3, vec![Edge::plain(1, 2)], 0, WeightModel::Edge);
        let report = analyze(&g, &deterministic(), &NoopMetrics).expect("analyze");

        assert_eq!(report.shortest_path.node_ids, vec![0]);
        assert_eq!(report.shortest_path.length, Some(0));
        assert_eq!(report.critical_path.node_ids, vec![0]);
        assert_eq!(
            report
                .shortest_distances_component
                .iter()
                .filter(|d| d.is_some())
                .count(),
            1
        );
    }

    #[test]
    fn nearest_policy_changes_only_the_shortest_target() {
        let g = Graph::from_edges(
            3,
            vec![Edge::new(0, 1, Some(1)), Edge::new(1, 2, Some(1))],
            0,
            WeightModel::Edge,
        );
        let nearest = AnalysisOptions {
            shortest_target: ShortestTarget::Nearest,
            include_timings: false,
        };
        let far = analyze(&g, &deterministic(), &NoopMetrics).expect("analyze");
        let near = analyze(&g, &nearest, &NoopMetrics).expect("analyze");

        assert_eq!(far.shortest_path.node_ids, vec![0, 1, 2]);
        assert_eq!(near.shortest_path.node_ids, vec![0, 1]);
        assert_eq!(far.critical_path, near.critical_path);
    }

    #[test]
    fn invalid_source_produces_no_report() {
        let g = Graph::from_edges(2, vec![Edge::plain(0, 1)], 9, WeightModel::Node);
        let err = analyze(&g, &deterministic(), &NoopMetrics).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn metrics_sink_does_not_change_the_report() {
        let g = Graph::from_edges(
            5,
            vec![
                Edge::plain(0, 1),
                Edge::plain(1, 2),
                Edge::plain(2, 0),
                Edge::plain(2, 3),
                Edge::plain(3, 4),
            ],
            0,
            WeightModel::Node,
        );
        let metrics = SimpleMetrics::new();
        let with = analyze(&g, &deterministic(), &metrics).expect("analyze");
        let without = analyze(&g, &deterministic(), &NoopMetrics).expect("analyze");

        assert_eq!(with, without);
        assert!(metrics.get("scc.dfs.visits") > 0);
        assert_eq!(
            metrics.get("dag.relaxations.attempted"),
            i64::try_from(with.relaxations.attempted).expect("fits")
        );
    }

    #[test]
    fn report_serializes_sentinels_as_null() {
        let g = Graph::from_edges(2, vec![Edge::plain(1, 0)], 0, WeightModel::Node);
        let report = analyze(&g, &deterministic(), &NoopMetrics).expect("analyze");
        let json = serde_json::to_value(&report).expect("serialize");

        let distances = json["shortest_distances_component"]
            .as_array()
            .expect("array");
        assert!(distances.iter().any(serde_json::Value::is_null));
        assert_eq!(json["weight_model"], "node");
        assert!(json["graph_fingerprint"]
            .as_str()
            .is_some_and(|s| s.starts_with("blake3:")));
    }
}
