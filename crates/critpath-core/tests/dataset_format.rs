//! Property tests for the dataset JSON format and the graph model built
//! from it.

use critpath_core::model::{Edge, Graph, Node, WeightModel};
use critpath_core::parse::{parse_graph_str, render_graph_str};
use proptest::prelude::*;

fn arb_graph() -> impl Strategy<Value = Graph> {
    (0_usize..16).prop_flat_map(|n| {
        let upper = i64::try_from(n).unwrap_or(0) + 3;
        let node = (-3_i64..upper, proptest::option::of(any::<u32>()));
        let edge = (-3_i64..upper, -3_i64..upper, proptest::option::of(any::<i32>()));
        let model = prop_oneof![Just(WeightModel::Node), Just(WeightModel::Edge)];
        (
            any::<bool>(),
            Just(n),
            proptest::collection::vec(node, n),
            proptest::collection::vec(edge, 0..(n * 2 + 1)),
            proptest::option::of(-3_i64..upper),
            model,
        )
            .prop_map(|(directed, n, nodes, edges, source, model)| {
                let nodes = nodes.into_iter().map(|(id, d)| Node::new(id, d)).collect();
                let edges = edges
                    .into_iter()
                    .map(|(u, v, w)| Edge::new(u, v, w))
                    .collect();
                Graph::new(directed, n, nodes, edges, source, model)
            })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn rendered_graphs_parse_back_unchanged(g in arb_graph()) {
        let rendered = render_graph_str(&g).expect("render");
        let parsed = parse_graph_str(&rendered).expect("reparse");
        prop_assert_eq!(parsed, g);
    }

    #[test]
    fn durations_cover_exactly_the_dense_range(g in arb_graph()) {
        let durations = g.durations();
        prop_assert_eq!(durations.len(), g.node_count());
        for node in g.nodes() {
            let in_range = g.node_index(node.id).is_some();
            let expected = usize::try_from(node.id)
                .ok()
                .is_some_and(|idx| idx < g.node_count());
            prop_assert_eq!(in_range, expected);
        }
    }

    #[test]
    fn partial_node_lists_are_padded(n in 0_usize..32, listed in 0_usize..8) {
        let listed = listed.min(n);
        let nodes: Vec<String> = (0..listed)
            .map(|id| format!(r#"{{"id": {id}, "duration": 1}}"#))
            .collect();
        let input = format!(r#"{{"n": {n}, "nodes": [{}]}}"#, nodes.join(","));

        let g = parse_graph_str(&input).expect("parse");
        prop_assert_eq!(g.nodes().len(), n);
        let total: u64 = g.durations().iter().sum();
        prop_assert_eq!(total, u64::try_from(listed).unwrap_or(u64::MAX));
    }
}
