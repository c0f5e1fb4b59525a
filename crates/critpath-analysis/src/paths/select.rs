//! Target selection policies.
//!
//! Which component a reported path ends at is a reporting decision, not a
//! property of the distances, so it is kept behind [`TargetSelector`].
//! All built-in policies only consider finite distances and break ties on
//! the lowest component id.

use crate::paths::engine::PathResult;

pub trait TargetSelector {
    /// Pick a target component, or `None` when nothing qualifies.
    fn select(&self, result: &PathResult) -> Option<usize>;
}

/// Maximum finite distance over every component, the source included.
///
/// The critical-path policy: reports the longest chain anywhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxDistance;

impl TargetSelector for MaxDistance {
    fn select(&self, result: &PathResult) -> Option<usize> {
        best_by(result, |_| true, |candidate, best| candidate > best)
    }
}

/// Maximum finite distance among components other than the source,
/// falling back to the source when nothing else is reachable.
#[derive(Debug, Clone, Copy, Default)]
pub struct FarthestReachable;

impl TargetSelector for FarthestReachable {
    fn select(&self, result: &PathResult) -> Option<usize> {
        let source = result.source_component;
        best_by(result, |c| c != source, |candidate, best| candidate > best)
            .or_else(|| result.is_reached(source).then_some(source))
    }
}

/// Minimum finite distance among components other than the source,
/// falling back to the source when nothing else is reachable.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestReachable;

impl TargetSelector for NearestReachable {
    fn select(&self, result: &PathResult) -> Option<usize> {
        let source = result.source_component;
        best_by(result, |c| c != source, |candidate, best| candidate < best)
            .or_else(|| result.is_reached(source).then_some(source))
    }
}

/// First component (ascending id) that `better` prefers over every other
/// eligible finite candidate.
fn best_by(
    result: &PathResult,
    eligible: impl Fn(usize) -> bool,
    better: impl Fn(i64, i64) -> bool,
) -> Option<usize> {
    let mut best: Option<(usize, i64)> = None;
    for component in (0..result.component_count()).filter(|&c| eligible(c)) {
        let Some(distance) = result.finite_distance(component) else {
            continue;
        };
        if best.is_none_or(|(_, current)| better(distance, current)) {
            best = Some((component, distance));
        }
    }
    best.map(|(component, _)| component)
}
