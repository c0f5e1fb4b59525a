#![forbid(unsafe_code)]
//! critpath-analysis library.
//!
//! The algorithmic core: strongly connected components, the condensation
//! DAG, a deterministic topological order and single-source shortest and
//! longest (critical) paths over that order.
//!
//! # Conventions
//!
//! - **Errors**: Stages return [`critpath_core::AnalysisError`]; nothing here
//!   retries or emits partial results.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).
//! - **Instrumentation**: Every stage takes a `&dyn Metrics` sink; results
//!   never depend on it.

pub mod graph;
pub mod paths;
pub mod pipeline;

pub use graph::{ComponentSet, Condensation, TopoOrder};
pub use paths::{PathResult, TargetSelector};
pub use pipeline::{
    AnalysisOptions, ChainOutput, DatasetReport, PathSummary, StageTimings, analyze, run_chain,
};
