//! critpath-sim library.
//!
//! Seeded generators for synthetic task graphs, used to populate empty data
//! directories, to drive benchmarks and to feed property tests. Nothing in
//! the analysis crates depends on this randomness.
//!
//! # Conventions
//!
//! - **Errors**: Use `anyhow::Result` for return types.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod generator;
pub mod rng;

pub use generator::{DatasetSpec, Shape, generate, standard_suite, write_suite};
pub use rng::DeterministicRng;
