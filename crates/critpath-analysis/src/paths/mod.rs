//! Distances and paths over the condensation.
//!
//! - [`engine`]: single forward relaxation pass per objective.
//! - [`weights`]: per-component weight tables for both weight models.
//! - [`reconstruct`]: parent-pointer walks and node-path expansion.
//! - [`select`]: pluggable target policies.

pub mod engine;
pub mod reconstruct;
pub mod select;
pub mod weights;

pub use engine::{
    FINITE_BOUND, Objective, PathEngine, PathResult, RelaxationStats, UNREACHED_LONGEST,
    UNREACHED_SHORTEST, is_finite, longest_paths, resolve_source, shortest_paths,
};
pub use reconstruct::{expand_to_node_path, reconstruct_component_path};
pub use select::{FarthestReachable, MaxDistance, NearestReachable, TargetSelector};
pub use weights::ComponentWeights;
