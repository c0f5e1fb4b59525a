#![no_main]

use critpath_analysis::paths::{is_finite, reconstruct_component_path};
use critpath_analysis::run_chain;
use critpath_core::metrics::NoopMetrics;
use critpath_core::model::{Edge, Graph, WeightModel};
use libfuzzer_sys::fuzz_target;

// Bytes become a small graph: first byte is n, then (u, v, w) triples.
// Endpoints may fall outside [0, n) and weights may be negative.
fuzz_target!(|data: &[u8]| {
    let Some((&n, rest)) = data.split_first() else {
        return;
    };
    let n = usize::from(n % 64) + 1;
    let edges = rest
        .chunks_exact(3)
        .map(|c| {
            Edge::new(
                i64::from(c[0] % 70) - 2,
                i64::from(c[1] % 70) - 2,
                Some(i32::from(c[2] as i8)),
            )
        })
        .collect();
    let model = if rest.len() % 2 == 0 {
        WeightModel::Edge
    } else {
        WeightModel::Node
    };
    let graph = Graph::from_edges(n, edges, 0, model);

    let chain = run_chain(&graph, &NoopMetrics).expect("source 0 is always valid");
    for result in [&chain.shortest, &chain.longest] {
        for c in 0..result.component_count() {
            let path = reconstruct_component_path(result, c);
            assert_eq!(path.is_empty(), !is_finite(result.distance[c]));
        }
    }
});
