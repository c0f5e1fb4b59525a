//! Known-topology regression tests for the full analysis chain.
//!
//! Each graph is small enough that components, orders and distances can be
//! worked out by hand; expected values are hardcoded.

use std::collections::BTreeSet;

use critpath_analysis::graph::{build_condensation, find_sccs, topological_order};
use critpath_analysis::paths::{
    MaxDistance, TargetSelector, longest_paths, reconstruct_component_path, shortest_paths,
};
use critpath_analysis::{AnalysisOptions, analyze, run_chain};
use critpath_core::metrics::{Metrics, NoopMetrics, SimpleMetrics};
use critpath_core::model::{Edge, Graph, Node, WeightModel};
use critpath_core::parse::parse_graph_str;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn plain(n: usize, edges: &[(i64, i64)], source: i64) -> Graph {
    Graph::from_edges(
        n,
        edges.iter().map(|&(u, v)| Edge::plain(u, v)).collect(),
        source,
        WeightModel::Node,
    )
}

fn with_durations(durations: &[u32], edges: &[(i64, i64)], source: i64) -> Graph {
    let nodes = durations
        .iter()
        .enumerate()
        .map(|(id, &d)| Node::new(i64::try_from(id).expect("fits"), Some(d)))
        .collect();
    Graph::new(
        true,
        durations.len(),
        nodes,
        edges.iter().map(|&(u, v)| Edge::plain(u, v)).collect(),
        Some(source),
        WeightModel::Node,
    )
}

fn options() -> AnalysisOptions {
    AnalysisOptions {
        include_timings: false,
        ..AnalysisOptions::default()
    }
}

fn member_sets(g: &Graph) -> BTreeSet<BTreeSet<usize>> {
    find_sccs(g, &NoopMetrics)
        .iter()
        .map(|c| c.iter().copied().collect())
        .collect()
}

// ---------------------------------------------------------------------------
// SCC
// ---------------------------------------------------------------------------

#[test]
fn three_cycle_is_one_component() {
    let sets = member_sets(&plain(3, &[(0, 1), (1, 2), (2, 0)], 0));
    assert_eq!(sets, BTreeSet::from([BTreeSet::from([0, 1, 2])]));
}

#[test]
fn chain_is_three_singletons() {
    let sets = member_sets(&plain(3, &[(0, 1), (1, 2)], 0));
    assert_eq!(
        sets,
        BTreeSet::from([
            BTreeSet::from([0]),
            BTreeSet::from([1]),
            BTreeSet::from([2])
        ])
    );
}

#[test]
fn nested_cycles_merge() {
    // Two cycles sharing node 2: 0→1→2→0 and 2→3→4→2.
    let sets = member_sets(&plain(
        6,
        &[(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 2), (4, 5)],
        0,
    ));
    assert_eq!(
        sets,
        BTreeSet::from([BTreeSet::from([0, 1, 2, 3, 4]), BTreeSet::from([5])])
    );
}

// ---------------------------------------------------------------------------
// Condensation + topological order
// ---------------------------------------------------------------------------

#[test]
fn condensation_counts_unique_cross_component_pairs() {
    // {0,1} → {2,3} through three node edges, {2,3} → {4} twice.
    let g = plain(
        5,
        &[(0, 1), (1, 0), (2, 3), (3, 2), (0, 2), (1, 3), (1, 2), (3, 4), (3, 4)],
        0,
    );
    let condensation = build_condensation(&g, find_sccs(&g, &NoopMetrics), &NoopMetrics);

    assert_eq!(condensation.component_count(), 3);
    assert_eq!(condensation.edge_count(), 2);
    for c in 0..condensation.component_count() {
        assert!(condensation.successors(c).all(|s| s != c));
    }
}

#[test]
fn independent_chains_interleave_by_component_id() {
    // 0→1 and 2→3. Components close as {1}, {0}, {3}, {2}.
    let g = plain(4, &[(0, 1), (2, 3)], 0);
    let condensation = build_condensation(&g, find_sccs(&g, &NoopMetrics), &NoopMetrics);
    let topo = topological_order(&condensation, &NoopMetrics).expect("acyclic");

    assert_eq!(topo.component_order, vec![1, 0, 3, 2]);
    assert_eq!(topo.node_order, vec![0, 1, 2, 3]);
}

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

#[test]
fn node_model_chain_distances() {
    let g = with_durations(&[2, 3, 4], &[(0, 1), (1, 2)], 0);
    let chain = run_chain(&g, &NoopMetrics).expect("chain");

    let by_node = |d: &[i64]| -> Vec<i64> {
        (0..3)
            .map(|node| d[chain.condensation.component_of(node).expect("mapped")])
            .collect()
    };
    assert_eq!(by_node(&chain.shortest.distance), vec![2, 5, 9]);
    assert_eq!(by_node(&chain.longest.distance), vec![2, 5, 9]);
}

#[test]
fn edge_model_chain_distances() {
    let g = Graph::from_edges(
        3,
        vec![Edge::new(0, 1, Some(3)), Edge::new(1, 2, Some(5))],
        0,
        WeightModel::Edge,
    );
    let report = analyze(&g, &options(), &NoopMetrics).expect("analyze");

    assert_eq!(report.critical_path.length, Some(8));
    assert_eq!(report.shortest_path.length, Some(8));
    assert_eq!(report.shortest_path.node_ids, vec![0, 1, 2]);
    let mut distances: Vec<i64> = report
        .shortest_distances_component
        .iter()
        .flatten()
        .copied()
        .collect();
    distances.sort_unstable();
    assert_eq!(distances, vec![0, 3, 8]);
}

#[test]
fn cycle_durations_add_up_inside_a_component() {
    // {0,1} (2 + 3) → 2 (4) → 3 (1)
    let g = with_durations(&[2, 3, 4, 1], &[(0, 1), (1, 0), (1, 2), (2, 3)], 0);
    let report = analyze(&g, &options(), &NoopMetrics).expect("analyze");

    assert_eq!(report.scc_count, 3);
    assert_eq!(report.critical_path.node_ids, vec![0, 1, 2, 3]);
    assert_eq!(report.critical_path.length, Some(10));
    assert_eq!(report.critical_path.component_ids.len(), 3);
}

#[test]
fn critical_and_shortest_diverge_on_a_diamond() {
    let g = Graph::from_edges(
        4,
        vec![
            Edge::new(0, 1, Some(1)),
            Edge::new(0, 2, Some(4)),
            Edge::new(1, 3, Some(1)),
            Edge::new(2, 3, Some(4)),
        ],
        0,
        WeightModel::Edge,
    );
    let report = analyze(&g, &options(), &NoopMetrics).expect("analyze");

    assert_eq!(report.critical_path.node_ids, vec![0, 2, 3]);
    assert_eq!(report.critical_path.length, Some(8));
    // Shortest distances: node 1 → 1, node 2 → 4, node 3 → 2 (via node 1).
    // The farthest shortest target is therefore node 2, not the sink.
    assert_eq!(report.shortest_path.node_ids, vec![0, 2]);
    assert_eq!(report.shortest_path.length, Some(4));
}

#[test]
fn source_to_itself_is_single_component_path() {
    let g = plain(3, &[(1, 2)], 0);
    let chain = run_chain(&g, &NoopMetrics).expect("chain");
    let source = chain.shortest.source_component;

    assert_eq!(reconstruct_component_path(&chain.shortest, source), vec![source]);
}

#[test]
fn unreachable_component_has_no_path() {
    let g = plain(3, &[(1, 0), (0, 2)], 0);
    let chain = run_chain(&g, &NoopMetrics).expect("chain");
    let upstream = chain.condensation.component_of(1).expect("mapped");

    assert!(reconstruct_component_path(&chain.shortest, upstream).is_empty());
    assert!(reconstruct_component_path(&chain.longest, upstream).is_empty());
    assert_eq!(chain.shortest.finite_distance(upstream), None);
}

#[test]
fn critical_target_may_be_the_source() {
    // Only the heavy source is reachable from itself.
    let g = with_durations(&[9, 1], &[(1, 0)], 0);
    let chain = run_chain(&g, &NoopMetrics).expect("chain");
    assert_eq!(
        MaxDistance.select(&chain.longest),
        Some(chain.longest.source_component)
    );
}

// ---------------------------------------------------------------------------
// Tolerance and determinism
// ---------------------------------------------------------------------------

#[test]
fn self_loops_parallel_and_out_of_range_edges_are_tolerated() {
    let g = plain(
        3,
        &[(0, 0), (0, 1), (0, 1), (1, 2), (2, 7), (-4, 1), (1, 1)],
        0,
    );
    let metrics = SimpleMetrics::new();
    let report = analyze(&g, &options(), &metrics).expect("analyze");

    assert_eq!(report.scc_count, 3);
    assert_eq!(report.condensation.dropped_edge_count, 2);
    assert_eq!(report.condensation.condensation_edge_count, 2);
    assert_eq!(metrics.get("scc.edges.dropped"), 2);
    assert_eq!(metrics.get("condensation.edges.skipped"), 2);
}

#[test]
fn sample_dataset_end_to_end() {
    let g = parse_graph_str(
        r#"{
            "directed": true,
            "n": 8,
            "edges": [
                {"u": 0, "v": 1, "w": 3},
                {"u": 1, "v": 2, "w": 2},
                {"u": 2, "v": 3, "w": 4},
                {"u": 3, "v": 1, "w": 1},
                {"u": 4, "v": 5, "w": 2},
                {"u": 5, "v": 6, "w": 5},
                {"u": 6, "v": 7, "w": 1}
            ],
            "source": 4,
            "weight_model": "edge"
        }"#,
    )
    .expect("parse");
    let report = analyze(&g, &options(), &NoopMetrics).expect("analyze");

    // {1,2,3} is the only cycle; everything else is a singleton.
    assert_eq!(report.scc_count, 6);
    assert_eq!(report.critical_path.node_ids, vec![4, 5, 6, 7]);
    assert_eq!(report.critical_path.length, Some(8));
    assert_eq!(report.shortest_path.node_ids, vec![4, 5, 6, 7]);
    assert_eq!(report.shortest_path.length, Some(8));
}

#[test]
fn repeated_runs_are_identical() {
    let g = plain(
        7,
        &[(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 3), (5, 6), (6, 5), (4, 5)],
        0,
    );
    let first = run_chain(&g, &NoopMetrics).expect("chain");
    let second = run_chain(&g, &SimpleMetrics::new()).expect("chain");

    assert_eq!(first.condensation, second.condensation);
    assert_eq!(first.topo, second.topo);
    assert_eq!(first.shortest, second.shortest);
    assert_eq!(first.longest, second.longest);

    let a = analyze(&g, &options(), &NoopMetrics).expect("analyze");
    let b = analyze(&g, &options(), &NoopMetrics).expect("analyze");
    assert_eq!(a, b);
}

#[test]
fn shortest_and_longest_share_source_validation() {
    let g = plain(2, &[(0, 1)], 2);
    let condensation = build_condensation(&g, find_sccs(&g, &NoopMetrics), &NoopMetrics);
    let topo = topological_order(&condensation, &NoopMetrics).expect("acyclic");

    let short = shortest_paths(&g, &condensation, &topo, &NoopMetrics).unwrap_err();
    let long = longest_paths(&g, &condensation, &topo, &NoopMetrics).unwrap_err();
    assert_eq!(short.error_code(), long.error_code());
    assert_eq!(short.error_code().code(), "E1001");
}
