//! Random task-graph datasets.
//!
//! # Shapes
//!
//! - [`Shape::Acyclic`]: every pair `i < j` gets the edge `i → j` with
//!   probability `p`, so the graph is a DAG.
//! - [`Shape::Cyclic`]: every ordered pair `i ≠ j` gets an edge with
//!   probability `p`; afterwards a 3-cycle `a → a+1 → a+2 → a` (mod `n`) is
//!   planted when `n ≥ 3` so at least one non-trivial SCC exists.
//!
//! Node durations (node model) and edge weights (edge model) are uniform in
//! `1..=10`. Every dataset uses source 0.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use critpath_core::model::{Edge, Graph, Node, WeightModel};
use critpath_core::parse::render_graph_str;
use tracing::{debug, info, instrument};

use crate::rng::DeterministicRng;

const MIN_WEIGHT: u32 = 1;
const MAX_WEIGHT: u32 = 10;
const PLANTED_EDGE_WEIGHT: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Acyclic,
    Cyclic,
}

/// Parameters of one generated dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSpec {
    pub name: &'static str,
    pub n: usize,
    pub edge_probability: f64,
    pub shape: Shape,
    pub weight_model: WeightModel,
    pub summary: &'static str,
}

impl DatasetSpec {
    #[must_use]
    pub const fn new(
        name: &'static str,
        n: usize,
        edge_probability: f64,
        shape: Shape,
        summary: &'static str,
    ) -> Self {
        Self {
            name,
            n,
            edge_probability,
            shape,
            weight_model: WeightModel::Node,
            summary,
        }
    }

    #[must_use]
    pub const fn with_weight_model(mut self, weight_model: WeightModel) -> Self {
        self.weight_model = weight_model;
        self
    }

    /// `<name>.json`
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.json", self.name)
    }
}

/// Nine datasets in three size tiers.
#[must_use]
pub fn standard_suite() -> Vec<DatasetSpec> {
    vec![
        DatasetSpec::new("small_dag", 7, 0.12, Shape::Acyclic, "n=7, DAG, sparse"),
        DatasetSpec::new("small_cycles", 8, 0.15, Shape::Cyclic, "n=8, 1-2 small cycles"),
        DatasetSpec::new("small_dense_cycle", 9, 0.5, Shape::Cyclic, "n=9, dense with cycles"),
        DatasetSpec::new("medium_mix1", 12, 0.12, Shape::Cyclic, "n=12, mixed"),
        DatasetSpec::new("medium_mix2", 15, 0.25, Shape::Cyclic, "n=15, mixed"),
        DatasetSpec::new("medium_dag", 14, 0.18, Shape::Acyclic, "n=14, DAG"),
        DatasetSpec::new("large_sparse", 25, 0.06, Shape::Cyclic, "n=25, sparse, mixed"),
        DatasetSpec::new("large_medium", 35, 0.12, Shape::Cyclic, "n=35, medium density"),
        DatasetSpec::new("large_dense", 45, 0.22, Shape::Cyclic, "n=45, denser"),
    ]
}

/// Draw one graph for `spec` from `rng`.
#[must_use]
pub fn generate(spec: &DatasetSpec, rng: &mut DeterministicRng) -> Graph {
    let n = spec.n;
    let node_model = spec.weight_model == WeightModel::Node;
    let edge_model = spec.weight_model == WeightModel::Edge;

    let nodes: Vec<Node> = (0..n)
        .map(|id| {
            let duration = node_model.then(|| rng.next_in_range(MIN_WEIGHT, MAX_WEIGHT));
            Node::new(to_id(id), duration)
        })
        .collect();

    let mut edges = Vec::new();
    let mut maybe_edge = |rng: &mut DeterministicRng, from: usize, to: usize| {
        if rng.chance(spec.edge_probability) {
            let weight = edge_model.then(|| {
                i32::try_from(rng.next_in_range(MIN_WEIGHT, MAX_WEIGHT)).unwrap_or(i32::MAX)
            });
            edges.push(Edge::new(to_id(from), to_id(to), weight));
        }
    };

    match spec.shape {
        Shape::Acyclic => {
            for from in 0..n {
                for to in from + 1..n {
                    maybe_edge(&mut *rng, from, to);
                }
            }
        }
        Shape::Cyclic => {
            for from in 0..n {
                for to in (0..n).filter(|&to| to != from) {
                    maybe_edge(&mut *rng, from, to);
                }
            }
        }
    }

    if spec.shape == Shape::Cyclic && n >= 3 {
        let a = usize::try_from(rng.next_bounded(n as u64)).unwrap_or(0);
        let b = (a + 1) % n;
        let c = (a + 2) % n;
        for (from, to) in [(a, b), (b, c), (c, a)] {
            let weight = edge_model.then_some(PLANTED_EDGE_WEIGHT);
            edges.push(Edge::new(to_id(from), to_id(to), weight));
        }
    }

    debug!(name = spec.name, n, edges = edges.len(), "generated dataset");
    Graph::new(true, n, nodes, edges, Some(0), spec.weight_model)
}

/// Write every dataset of [`standard_suite`] plus `README_Data.md` into
/// `dir`, creating it if needed. Returns the written dataset paths.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or a file cannot be
/// written.
#[instrument(skip_all, fields(dir = %dir.display(), seed = seed))]
pub fn write_suite(dir: &Path, seed: u64) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let suite = standard_suite();
    let mut rng = DeterministicRng::new(seed);
    let mut written = Vec::with_capacity(suite.len());

    for spec in &suite {
        let graph = generate(spec, &mut rng);
        let path = dir.join(spec.file_name());
        let body = render_graph_str(&graph)
            .with_context(|| format!("Failed to render dataset {}", spec.name))?;
        std::fs::write(&path, body)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        written.push(path);
    }

    let readme = dir.join("README_Data.md");
    std::fs::write(&readme, suite_readme(&suite, seed))
        .with_context(|| format!("Failed to write {}", readme.display()))?;

    info!(datasets = written.len(), "wrote dataset suite");
    Ok(written)
}

fn suite_readme(suite: &[DatasetSpec], seed: u64) -> String {
    let mut out = String::from("# Generated datasets\n\n");
    for spec in suite {
        let _ = writeln!(out, "- {}: {}", spec.file_name(), spec.summary);
    }
    let _ = write!(
        out,
        "\nGenerated with seed {seed}. Each file contains fields: directed, n, nodes \
         (with durations for node-model), edges (u, v, w), source, weight_model.\n"
    );
    out
}

fn to_id(index: usize) -> i64 {
    i64::try_from(index).unwrap_or(i64::MAX)
}
