//! `critpath dot`: print the condensation of a dataset as Graphviz DOT.
//!
//! Each DOT node is one component, labelled `C<id>: [members]`. The source
//! is not needed, so datasets without one still render.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use critpath_analysis::Condensation;
use critpath_analysis::graph::{build_condensation, find_sccs};
use critpath_core::metrics::NoopMetrics;
use critpath_core::parse::parse_graph_file;
use petgraph::dot::{Config, Dot};
use serde::Serialize;

use crate::output::{CliError, OutputMode, id_list, render_error, render_mode};

#[derive(Args, Debug)]
pub struct DotArgs {
    /// Dataset JSON file.
    pub file: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct DotOutput {
    pub components: Vec<Vec<usize>>,
    pub edges: Vec<(usize, usize)>,
    pub dot: String,
}

/// Execute `critpath dot`.
pub fn run_dot(args: &DotArgs, output: OutputMode) -> anyhow::Result<()> {
    let graph = match parse_graph_file(&args.file) {
        Ok(graph) => graph,
        Err(err) => {
            render_error(output, &CliError::from(&err))?;
            anyhow::bail!("failed to load {}", args.file.display());
        }
    };

    let condensation = build_condensation(&graph, find_sccs(&graph, &NoopMetrics), &NoopMetrics);
    let payload = dot_output(&condensation);

    render_mode(output, &payload, write_dot, write_dot)
}

fn dot_output(condensation: &Condensation) -> DotOutput {
    let exported = condensation.to_petgraph();
    let labelled = exported.map(
        |idx, members| format!("C{}: {}", idx.index(), id_list(members)),
        |_, ()| "",
    );
    let dot = Dot::with_config(&labelled, &[Config::EdgeNoLabel]).to_string();

    DotOutput {
        components: exported.node_weights().cloned().collect(),
        edges: exported
            .raw_edges()
            .iter()
            .map(|e| (e.source().index(), e.target().index()))
            .collect(),
        dot,
    }
}

fn write_dot(out: &DotOutput, w: &mut dyn Write) -> io::Result<()> {
    w.write_all(out.dot.as_bytes())
}
