//! Path reconstruction from parent pointers.

use crate::graph::scc::ComponentSet;
use crate::paths::engine::PathResult;

/// Component path `source → … → target`, or empty when the parent chain
/// from `target` does not end at the result's source component.
///
/// The walk is bounded by the component count, so a malformed parent array
/// cannot loop forever.
#[must_use]
pub fn reconstruct_component_path(result: &PathResult, target: usize) -> Vec<usize> {
    let source = result.source_component;
    if target >= result.component_count() {
        return Vec::new();
    }

    let mut reversed = vec![target];
    let mut current = target;
    while current != source {
        if reversed.len() > result.component_count() {
            return Vec::new();
        }
        match result.parent.get(current).copied().flatten() {
            Some(parent) => {
                reversed.push(parent);
                current = parent;
            }
            None => return Vec::new(),
        }
    }

    reversed.reverse();
    reversed
}

/// Expand a component path into node ids: each component's members in
/// ascending order, concatenated in path order.
#[must_use]
pub fn expand_to_node_path(components: &ComponentSet, component_path: &[usize]) -> Vec<usize> {
    component_path
        .iter()
        .flat_map(|&id| components.sorted_members(id))
        .collect()
}
