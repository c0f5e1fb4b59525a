//! Deterministic topological order of the condensation.
//!
//! Kahn's algorithm with a min-heap of ready components: whenever several
//! components have no unprocessed predecessors, the smallest id goes first.
//! The order is therefore a pure function of the condensation.
//!
//! The derived node order lists each component's members (ascending)
//! back to back in component order.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use critpath_core::error::AnalysisError;
use critpath_core::metrics::Metrics;
use tracing::{instrument, warn};

use crate::graph::condensation::Condensation;

/// Component order plus the node order it induces.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TopoOrder {
    pub component_order: Vec<usize>,
    pub node_order: Vec<usize>,
}

impl TopoOrder {
    /// Position of each component in `component_order`.
    #[must_use]
    pub fn positions(&self) -> Vec<usize> {
        let mut position = vec![usize::MAX; self.component_order.len()];
        for (pos, &component) in self.component_order.iter().enumerate() {
            if let Some(slot) = position.get_mut(component) {
                *slot = pos;
            }
        }
        position
    }
}

/// Order the components of `condensation` topologically.
///
/// # Errors
///
/// [`AnalysisError::CycleInCondensation`] when fewer than `k` components
/// could be emitted. That cannot happen for a condensation of a genuine SCC
/// decomposition.
#[instrument(skip_all, fields(k = condensation.component_count()))]
pub fn topological_order(
    condensation: &Condensation,
    metrics: &dyn Metrics,
) -> Result<TopoOrder, AnalysisError> {
    metrics.start_timer();

    let k = condensation.component_count();
    let mut indegree = condensation.in_degrees();

    let mut ready: BinaryHeap<Reverse<usize>> = indegree
        .iter()
        .enumerate()
        .filter(|&(_, &d)| d == 0)
        .map(|(id, _)| Reverse(id))
        .collect();
    metrics.increment_by("topo.kahn.push", i64::try_from(ready.len()).unwrap_or(i64::MAX));

    let mut component_order = Vec::with_capacity(k);
    while let Some(Reverse(current)) = ready.pop() {
        metrics.increment("topo.kahn.pop");
        component_order.push(current);

        for next in condensation.successors(current) {
            indegree[next] -= 1;
            if indegree[next] == 0 {
                ready.push(Reverse(next));
                metrics.increment("topo.kahn.push");
            }
        }
    }

    metrics.record_elapsed("topo.time.nanos");

    if component_order.len() != k {
        warn!(
            emitted = component_order.len(),
            expected = k,
            "condensation is not acyclic"
        );
        return Err(AnalysisError::CycleInCondensation {
            emitted: component_order.len(),
            expected: k,
        });
    }

    let components = condensation.components();
    let node_order = component_order
        .iter()
        .flat_map(|&id| components.sorted_members(id))
        .collect();

    Ok(TopoOrder {
        component_order,
        node_order,
    })
}
