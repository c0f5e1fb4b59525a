//! `critpath run`: analyse every dataset in a directory and export results.
//!
//! Datasets are processed in file-name order. A dataset that fails to parse,
//! analyse or export is logged and listed as failed; the batch carries on and
//! the command exits non-zero once every file has been tried.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Args;
use critpath_analysis::{AnalysisOptions, DatasetReport, analyze};
use critpath_core::config::ProjectConfig;
use critpath_core::error::ErrorCode;
use critpath_core::metrics::{Metrics, SimpleMetrics};
use critpath_core::parse::parse_graph_file;
use serde::Serialize;
use tracing::{debug, error, info, instrument};

use crate::cmd::analyze::dataset_name;
use crate::cmd::{TargetArg, analysis_options};
use crate::export::{SummaryCsv, write_dataset_json};
use crate::output::{
    CliError, OutputMode, id_list, pretty_kv, pretty_rule, pretty_section, render_error,
    render_mode,
};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Directory of dataset JSON files (default: `run.data_dir`).
    pub data_dir: Option<PathBuf>,

    /// Directory for result files (default: `run.results_dir`).
    pub results_dir: Option<PathBuf>,

    /// Do not generate the standard suite into an empty data directory.
    #[arg(long)]
    pub no_generate: bool,

    /// Generator seed when the suite is generated.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Policy for the reported shortest-path target (overrides config).
    #[arg(long, value_enum)]
    pub shortest_target: Option<TargetArg>,
}

#[derive(Debug, Serialize)]
pub struct RunOutput {
    pub data_dir: PathBuf,
    pub results_dir: PathBuf,
    pub generated: bool,
    pub datasets: Vec<DatasetOutcome>,
}

impl RunOutput {
    fn failed(&self) -> usize {
        self.datasets.iter().filter(|d| d.error.is_some()).count()
    }
}

#[derive(Debug, Serialize)]
pub struct DatasetOutcome {
    pub dataset: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scc_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub critical_path_length: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shortest_path_length: Option<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub shortest_path_nodes: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CliError>,
}

impl DatasetOutcome {
    fn succeeded(dataset: String, report: &DatasetReport) -> Self {
        Self {
            dataset,
            scc_count: Some(report.scc_count),
            critical_path_length: report.critical_path.length,
            shortest_path_length: report.shortest_path.length,
            shortest_path_nodes: report.shortest_path.node_ids.clone(),
            error: None,
        }
    }

    const fn failed(dataset: String, error: CliError) -> Self {
        Self {
            dataset,
            scc_count: None,
            critical_path_length: None,
            shortest_path_length: None,
            shortest_path_nodes: Vec::new(),
            error: Some(error),
        }
    }
}

/// Execute `critpath run`.
#[instrument(skip_all)]
pub fn run_batch(args: &RunArgs, config: &ProjectConfig, output: OutputMode) -> anyhow::Result<()> {
    let data_dir = args.data_dir.clone().unwrap_or_else(|| config.run.data_dir.clone());
    let results_dir = args
        .results_dir
        .clone()
        .unwrap_or_else(|| config.run.results_dir.clone());
    let options = analysis_options(config, args.shortest_target);

    let mut files = list_datasets(&data_dir)?;
    let mut generated = false;
    if files.is_empty() && config.run.generate_when_empty && !args.no_generate {
        let seed = args.seed.unwrap_or(config.generate.seed);
        info!(dir = %data_dir.display(), seed, "no datasets found, generating suite");
        critpath_sim::write_suite(&data_dir, seed)?;
        generated = true;
        files = list_datasets(&data_dir)?;
    }

    if files.is_empty() {
        render_error(
            output,
            &CliError::with_code(
                format!("no dataset files in {}", data_dir.display()),
                ErrorCode::DatasetReadFailed,
            ),
        )?;
        anyhow::bail!("nothing to analyse");
    }

    let summary = SummaryCsv::open(&results_dir)?;
    let datasets = files
        .iter()
        .map(|path| process_dataset(path, &results_dir, &summary, &options))
        .collect();

    let payload = RunOutput {
        data_dir,
        results_dir,
        generated,
        datasets,
    };
    render_mode(output, &payload, render_text, render_pretty)?;

    let failed = payload.failed();
    if failed > 0 {
        anyhow::bail!("{failed} of {} datasets failed", payload.datasets.len());
    }
    info!(datasets = payload.datasets.len(), results = %payload.results_dir.display(), "batch complete");
    Ok(())
}

/// `*.json` files directly under `dir`, sorted by file name. A missing
/// directory has no datasets.
pub fn list_datasets(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in
        std::fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))?
    {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

#[instrument(skip_all, fields(dataset = %path.display()))]
fn process_dataset(
    path: &Path,
    results_dir: &Path,
    summary: &SummaryCsv,
    options: &AnalysisOptions,
) -> DatasetOutcome {
    let name = dataset_name(path);
    let metrics = SimpleMetrics::new();

    let report = match parse_graph_file(path).and_then(|graph| analyze(&graph, options, &metrics)) {
        Ok(report) => report,
        Err(err) => {
            error!(dataset = %name, code = %err.error_code(), error = %err, "dataset failed");
            return DatasetOutcome::failed(name, CliError::from(&err));
        }
    };
    debug!(dataset = %name, counters = ?metrics.snapshot(), "dataset counters");

    let stem = path
        .file_stem()
        .map_or_else(|| name.clone(), |s| s.to_string_lossy().into_owned());
    let exported = write_dataset_json(results_dir, &stem, &name, &report)
        .and_then(|_| summary.append(&name, &report));
    if let Err(err) = exported {
        error!(dataset = %name, error = %err, "failed to export results");
        return DatasetOutcome::failed(
            name,
            CliError::with_code(format!("{err:#}"), ErrorCode::ResultWriteFailed),
        );
    }

    DatasetOutcome::succeeded(name, &report)
}

fn length(value: Option<i64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn render_text(out: &RunOutput, w: &mut dyn Write) -> io::Result<()> {
    for d in &out.datasets {
        match &d.error {
            None => writeln!(
                w,
                "ok {} scc={} critical={} shortest={} nodes={}",
                d.dataset,
                d.scc_count.unwrap_or(0),
                length(d.critical_path_length),
                length(d.shortest_path_length),
                id_list(&d.shortest_path_nodes)
            )?,
            Some(err) => writeln!(w, "failed {} {}", d.dataset, err.message)?,
        }
    }
    writeln!(w, "results={}", out.results_dir.display())
}

fn render_pretty(out: &RunOutput, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Batch run")?;
    pretty_kv(w, "Data", out.data_dir.display().to_string())?;
    pretty_kv(w, "Results", out.results_dir.display().to_string())?;
    if out.generated {
        pretty_kv(w, "Generated", "standard suite")?;
    }
    writeln!(w)?;

    writeln!(
        w,
        "{:<28} {:>5} {:>9} {:>9}  shortest nodes",
        "dataset", "scc", "critical", "shortest"
    )?;
    pretty_rule(w)?;
    for d in &out.datasets {
        match &d.error {
            None => writeln!(
                w,
                "{:<28} {:>5} {:>9} {:>9}  {}",
                d.dataset,
                d.scc_count.unwrap_or(0),
                length(d.critical_path_length),
                length(d.shortest_path_length),
                id_list(&d.shortest_path_nodes)
            )?,
            Some(err) => writeln!(w, "{:<28} ✗ {}", d.dataset, err.message)?,
        }
    }

    let failed = out.failed();
    writeln!(w)?;
    if failed == 0 {
        writeln!(w, "✓ {} datasets analysed", out.datasets.len())
    } else {
        writeln!(w, "✗ {failed} of {} datasets failed", out.datasets.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const GOOD: &str = r#"{"n": 3, "edges": [{"u": 0, "v": 1}, {"u": 1, "v": 2}], "source": 0}"#;
    const BAD_SOURCE: &str = r#"{"n": 2, "edges": [], "source": 5}"#;

    #[test]
    fn list_datasets_sorts_and_filters() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("b.json"), GOOD).expect("write");
        fs::write(dir.path().join("a.json"), GOOD).expect("write");
        fs::write(dir.path().join("notes.md"), "x").expect("write");

        let files = list_datasets(dir.path()).expect("list");
        let names: Vec<String> = files.iter().map(|p| dataset_name(p)).collect();
        assert_eq!(names, vec!["a.json", "b.json"]);
    }

    #[test]
    fn missing_directory_has_no_datasets() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(list_datasets(&dir.path().join("absent")).expect("list").is_empty());
    }

    #[test]
    fn failed_dataset_is_reported_without_artifacts() {
        let dir = tempfile::tempdir().expect("tempdir");
        let data = dir.path().join("bad.json");
        fs::write(&data, BAD_SOURCE).expect("write");
        let results = dir.path().join("results");
        let summary = SummaryCsv::open(&results).expect("summary");

        let outcome = process_dataset(&data, &results, &summary, &AnalysisOptions::default());

        let err = outcome.error.expect("failure");
        assert_eq!(err.error_code.as_deref(), Some("E1001"));
        assert!(!results.join("bad.json").exists());
        let csv = fs::read_to_string(summary.path()).expect("read");
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn good_dataset_writes_json_and_row() {
        let dir = tempfile::tempdir().expect("tempdir");
        let data = dir.path().join("chain.json");
        fs::write(&data, GOOD).expect("write");
        let results = dir.path().join("results");
        let summary = SummaryCsv::open(&results).expect("summary");

        let outcome = process_dataset(&data, &results, &summary, &AnalysisOptions::default());

        assert!(outcome.error.is_none());
        assert_eq!(outcome.scc_count, Some(3));
        assert!(results.join("chain.json").exists());
        let csv = fs::read_to_string(summary.path()).expect("read");
        assert!(csv.lines().nth(1).is_some_and(|row| row.starts_with("chain.json,3,2,node,3,")));
    }
}
