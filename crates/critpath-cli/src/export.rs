//! Result artifacts of a batch run: one pretty JSON file per dataset plus a
//! shared `summary.csv`.
//!
//! The CSV header is written only when the file does not exist yet; later
//! runs append rows. List columns use `[a; b; c]` so they survive naive
//! comma splitting, and a missing path length is written as `-1`. The
//! dataset name is the only free-text column and is quoted when needed.

use std::fmt::Write as _;
use std::fs::{self, OpenOptions};
use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use critpath_analysis::DatasetReport;
use serde::Serialize;
use tracing::debug;

pub const SUMMARY_FILE_NAME: &str = "summary.csv";

pub const SUMMARY_HEADER: &str = "dataset,n,m,weight_model,scc_count,time_scc_ns,\
time_condense_ns,time_topo_ns,time_dag_ns,dag_relaxations,critical_path_len,\
critical_path_nodes,shortest_path_len,shortest_path_nodes,component_order,derived_task_order";

/// A report tagged with the dataset file it came from.
#[derive(Debug, Serialize)]
pub struct ExportedReport<'a> {
    pub dataset: &'a str,
    #[serde(flatten)]
    pub report: &'a DatasetReport,
}

/// Write `<results_dir>/<stem>.json`.
///
/// # Errors
///
/// Returns an error if the report cannot be serialized or the file written.
pub fn write_dataset_json(
    results_dir: &Path,
    stem: &str,
    dataset: &str,
    report: &DatasetReport,
) -> Result<PathBuf> {
    let path = results_dir.join(format!("{stem}.json"));
    let mut body = serde_json::to_string_pretty(&ExportedReport { dataset, report })
        .context("Failed to serialize dataset report")?;
    body.push('\n');
    fs::write(&path, body).with_context(|| format!("Failed to write {}", path.display()))?;
    debug!(path = %path.display(), "wrote dataset report");
    Ok(path)
}

/// Append-only handle on `summary.csv`.
#[derive(Debug)]
pub struct SummaryCsv {
    path: PathBuf,
}

impl SummaryCsv {
    /// Create `results_dir` if needed and write the header when the summary
    /// file is new.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or header cannot be written.
    pub fn open(results_dir: &Path) -> Result<Self> {
        fs::create_dir_all(results_dir)
            .with_context(|| format!("Failed to create {}", results_dir.display()))?;

        let path = results_dir.join(SUMMARY_FILE_NAME);
        if !path.exists() {
            fs::write(&path, format!("{SUMMARY_HEADER}\n"))
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one row for `report`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened for appending.
    pub fn append(&self, dataset: &str, report: &DatasetReport) -> Result<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;
        writeln!(file, "{}", summary_row(dataset, report))
            .with_context(|| format!("Failed to append to {}", self.path.display()))
    }
}

/// One CSV row, without the trailing newline.
pub fn summary_row(dataset: &str, report: &DatasetReport) -> String {
    let t = &report.timings;
    let mut row = String::new();
    let _ = write!(
        row,
        "{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
        csv_field(dataset),
        report.n,
        report.m,
        report.weight_model,
        report.scc_count,
        t.scc_ns,
        t.condensation_ns,
        t.topo_ns,
        t.dag_ns,
        report.relaxations.attempted,
        report.critical_path.length.unwrap_or(-1),
        csv_list(&report.critical_path.node_ids),
        report.shortest_path.length.unwrap_or(-1),
        csv_list(&report.shortest_path.node_ids),
        csv_list(&report.component_order),
        csv_list(&report.derived_task_order),
    );
    row
}

/// Quote `value` when it contains a delimiter, quote or line break,
/// doubling embedded quotes.
pub fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// `[a; b; c]`
pub fn csv_list(ids: &[usize]) -> String {
    let joined: Vec<String> = ids.iter().map(ToString::to_string).collect();
    format!("[{}]", joined.join("; "))
}
