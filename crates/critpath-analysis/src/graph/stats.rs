//! Summary statistics over a condensation.
//!
//! - **component_count**: number of SCCs (`k`). Equals `n` for a DAG.
//! - **cyclic_component_count**: SCCs with more than one member.
//! - **largest_component_size**: member count of the biggest SCC.
//! - **condensation_edge_count**: distinct component edges.
//! - **dropped_edge_count**: input edges referencing nodes outside `[0, n)`.

use critpath_core::model::Graph;
use serde::Serialize;

use crate::graph::condensation::Condensation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CondensationStats {
    pub component_count: usize,
    pub cyclic_component_count: usize,
    pub largest_component_size: usize,
    pub condensation_edge_count: usize,
    pub dropped_edge_count: usize,
}

impl CondensationStats {
    #[must_use]
    pub fn from_condensation(graph: &Graph, condensation: &Condensation) -> Self {
        let sizes = condensation.component_sizes();
        Self {
            component_count: condensation.component_count(),
            cyclic_component_count: sizes.iter().filter(|&&size| size > 1).count(),
            largest_component_size: sizes.iter().copied().max().unwrap_or(0),
            condensation_edge_count: condensation.edge_count(),
            dropped_edge_count: graph
                .edges()
                .iter()
                .filter(|e| graph.node_index(e.from).is_none() || graph.node_index(e.to).is_none())
                .count(),
        }
    }
}
