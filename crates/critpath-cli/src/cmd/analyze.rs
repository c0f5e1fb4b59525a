//! `critpath analyze`: analyse one dataset file and print its report.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use critpath_analysis::{DatasetReport, analyze};
use critpath_core::config::ProjectConfig;
use critpath_core::metrics::{Metrics, SimpleMetrics};
use critpath_core::parse::parse_graph_file;
use serde::Serialize;
use tracing::instrument;

use crate::cmd::{TargetArg, analysis_options};
use crate::output::{
    CliError, OutputMode, id_list, pretty_kv, pretty_section, render_error, render_mode,
};

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Dataset JSON file.
    pub file: PathBuf,

    /// Policy for the reported shortest-path target (overrides config).
    #[arg(long, value_enum)]
    pub shortest_target: Option<TargetArg>,

    /// Include the stage counters in the output.
    #[arg(long)]
    pub counters: bool,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeOutput {
    pub dataset: String,
    #[serde(flatten)]
    pub report: DatasetReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counters: Option<BTreeMap<String, i64>>,
}

/// Execute `critpath analyze`.
#[instrument(skip_all, fields(file = %args.file.display()))]
pub fn run_analyze(
    args: &AnalyzeArgs,
    config: &ProjectConfig,
    output: OutputMode,
) -> anyhow::Result<()> {
    let options = analysis_options(config, args.shortest_target);
    let metrics = SimpleMetrics::new();

    let result = parse_graph_file(&args.file).and_then(|graph| analyze(&graph, &options, &metrics));
    let report = match result {
        Ok(report) => report,
        Err(err) => {
            render_error(output, &CliError::from(&err))?;
            anyhow::bail!("analysis of {} failed", args.file.display());
        }
    };

    let payload = AnalyzeOutput {
        dataset: dataset_name(&args.file),
        report,
        counters: args.counters.then(|| metrics.snapshot()),
    };

    render_mode(output, &payload, render_text, render_pretty)
}

pub fn dataset_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned())
}

fn length(value: Option<i64>) -> String {
    value.map_or_else(|| "none".to_string(), |v| v.to_string())
}

fn render_text(out: &AnalyzeOutput, w: &mut dyn Write) -> io::Result<()> {
    let r = &out.report;
    writeln!(w, "dataset={}", out.dataset)?;
    writeln!(w, "n={} m={} weight_model={}", r.n, r.m, r.weight_model)?;
    writeln!(w, "scc_count={} source_component={}", r.scc_count, r.source_component)?;
    writeln!(w, "component_order={}", id_list(&r.component_order))?;
    writeln!(w, "derived_task_order={}", id_list(&r.derived_task_order))?;
    writeln!(
        w,
        "critical_path={} length={}",
        id_list(&r.critical_path.node_ids),
        length(r.critical_path.length)
    )?;
    writeln!(
        w,
        "shortest_path={} length={}",
        id_list(&r.shortest_path.node_ids),
        length(r.shortest_path.length)
    )?;
    if let Some(counters) = &out.counters {
        for (name, value) in counters {
            writeln!(w, "counter.{name}={value}")?;
        }
    }
    Ok(())
}

fn render_pretty(out: &AnalyzeOutput, w: &mut dyn Write) -> io::Result<()> {
    let r = &out.report;
    pretty_section(w, &format!("Dataset {}", out.dataset))?;
    pretty_kv(w, "Nodes", r.n.to_string())?;
    pretty_kv(w, "Edges", r.m.to_string())?;
    pretty_kv(w, "Weight model", r.weight_model.as_str())?;
    pretty_kv(
        w,
        "Components",
        format!(
            "{} ({} cyclic, largest {})",
            r.scc_count, r.condensation.cyclic_component_count, r.condensation.largest_component_size
        ),
    )?;
    if r.condensation.dropped_edge_count > 0 {
        pretty_kv(
            w,
            "Dropped edges",
            r.condensation.dropped_edge_count.to_string(),
        )?;
    }
    pretty_kv(w, "Task order", id_list(&r.derived_task_order))?;

    writeln!(w)?;
    pretty_section(w, "Critical path")?;
    pretty_kv(w, "Nodes", id_list(&r.critical_path.node_ids))?;
    pretty_kv(w, "Length", length(r.critical_path.length))?;

    writeln!(w)?;
    pretty_section(w, "Shortest path")?;
    pretty_kv(w, "Nodes", id_list(&r.shortest_path.node_ids))?;
    pretty_kv(w, "Length", length(r.shortest_path.length))?;

    let t = &r.timings;
    if t.scc_ns + t.condensation_ns + t.topo_ns + t.dag_ns > 0 {
        writeln!(w)?;
        pretty_section(w, "Timings (ns)")?;
        pretty_kv(w, "SCC", t.scc_ns.to_string())?;
        pretty_kv(w, "Condensation", t.condensation_ns.to_string())?;
        pretty_kv(w, "Topological", t.topo_ns.to_string())?;
        pretty_kv(w, "DAG paths", t.dag_ns.to_string())?;
    }

    if let Some(counters) = &out.counters {
        writeln!(w)?;
        pretty_section(w, "Counters")?;
        for (name, value) in counters {
            pretty_kv(w, name, value.to_string())?;
        }
    }
    Ok(())
}
