#![forbid(unsafe_code)]
//! critpath-core library.
//!
//! Shared vocabulary for every other critpath crate: the immutable task
//! graph model, the error taxonomy, the instrumentation sink the analysis
//! stages report into, the dataset parser and project configuration.
//!
//! # Conventions
//!
//! - **Errors**: Typed [`error::AnalysisError`] for pipeline failures,
//!   `anyhow::Result` for glue code (config loading).
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod error;
pub mod metrics;
pub mod model;
pub mod parse;
pub mod timing;

pub use error::{AnalysisError, ErrorCode};
pub use metrics::{Metrics, NoopMetrics, SimpleMetrics};
pub use model::{Edge, Graph, Node, WeightModel};
