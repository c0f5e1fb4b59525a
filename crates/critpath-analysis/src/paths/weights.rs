//! Per-component weight tables shared by the shortest and longest passes.

use std::collections::BTreeMap;

use critpath_core::model::{Graph, WeightModel};

use crate::graph::condensation::Condensation;

/// Precomputed weights for one condensation under one weight model.
///
/// - Node model: `node_weight[c]` is the sum of member durations (missing
///   durations count as 0). Edge pairs are left empty.
/// - Edge model: `pair_weight[(cu, cv)]` is the minimum weight among input
///   edges crossing `cu → cv` (missing weights count as 0). Node weights are
///   all 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentWeights {
    model: WeightModel,
    node_weight: Vec<i64>,
    pair_weight: BTreeMap<(usize, usize), i64>,
}

impl ComponentWeights {
    #[must_use]
    pub fn build(graph: &Graph, condensation: &Condensation) -> Self {
        let k = condensation.component_count();
        let mut node_weight = vec![0_i64; k];
        let mut pair_weight = BTreeMap::new();

        match graph.weight_model() {
            WeightModel::Node => {
                let durations = graph.durations();
                for (id, members) in condensation.components().iter().enumerate() {
                    node_weight[id] = members
                        .iter()
                        .filter_map(|&node| durations.get(node))
                        .fold(0_i64, |sum, &d| {
                            sum.saturating_add(i64::try_from(d).unwrap_or(i64::MAX))
                        });
                }
            }
            WeightModel::Edge => {
                for edge in graph.edges() {
                    let endpoints = graph
                        .node_index(edge.from)
                        .zip(graph.node_index(edge.to))
                        .and_then(|(u, v)| {
                            condensation.component_of(u).zip(condensation.component_of(v))
                        });
                    let Some((from, to)) = endpoints else {
                        continue;
                    };
                    if from == to {
                        continue;
                    }

                    let weight = i64::from(edge.weight.unwrap_or(0));
                    pair_weight
                        .entry((from, to))
                        .and_modify(|w: &mut i64| *w = (*w).min(weight))
                        .or_insert(weight);
                }
            }
        }

        Self {
            model: graph.weight_model(),
            node_weight,
            pair_weight,
        }
    }

    /// Distance the source component starts at.
    #[must_use]
    pub fn source_weight(&self, component: usize) -> i64 {
        match self.model {
            WeightModel::Node => self.node_weight(component),
            WeightModel::Edge => 0,
        }
    }

    /// Weight added when stepping `from → to`.
    #[must_use]
    pub fn step_weight(&self, from: usize, to: usize) -> i64 {
        match self.model {
            WeightModel::Node => self.node_weight(to),
            WeightModel::Edge => self.pair_weight.get(&(from, to)).copied().unwrap_or(0),
        }
    }

    /// Summed member durations; 0 under the edge model.
    #[must_use]
    pub fn node_weight(&self, component: usize) -> i64 {
        self.node_weight.get(component).copied().unwrap_or(0)
    }
}
