//! Structural stages of the analysis chain.
//!
//! # Overview
//!
//! Data flows strictly downstream; each stage consumes the previous stage's
//! output and is a pure function of it.
//!
//! ## Pipeline
//!
//! ```text
//! Graph (critpath_core::model, possibly cyclic, may hold out-of-range edges)
//!        ↓  build::Adjacency::from_graph()       drops out-of-range edges
//!        ↓  scc::find_sccs()                     low-link search, explicit stack
//! ComponentSet (components in the order their roots close)
//!        ↓  condensation::build_condensation()
//! Condensation (node → component, deduplicated component adjacency)
//!        ↓  topo::topological_order()            Kahn, min-id tie-break
//! TopoOrder (component order + derived node order)
//!        ↓  crate::paths
//! ```
//!
//! ## Typical Usage
//!
//! ```rust,ignore
//! use critpath_core::NoopMetrics;
//! use critpath_analysis::graph::{build_condensation, find_sccs, topological_order};
//!
//! let components = find_sccs(&graph, &NoopMetrics);
//! let condensation = build_condensation(&graph, components, &NoopMetrics);
//! let topo = topological_order(&condensation, &NoopMetrics)?;
//! ```

pub mod build;
pub mod condensation;
pub mod scc;
pub mod stats;
pub mod topo;

pub use build::{Adjacency, fingerprint};
pub use condensation::{Condensation, build_condensation};
pub use scc::{ComponentSet, find_sccs};
pub use stats::CondensationStats;
pub use topo::{TopoOrder, topological_order};
