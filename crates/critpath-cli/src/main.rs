#![forbid(unsafe_code)]

mod cmd;
mod export;
mod output;

use std::env;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use critpath_core::config::{ProjectConfig, load_config, load_project_config};
use critpath_core::error::ErrorCode;
use critpath_core::timing;
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "critpath: SCC condensation and critical-path analysis for task graphs",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Emit the stage timing report to stderr.
    #[arg(long, global = true)]
    timing: bool,

    /// Output format: pretty, text or json.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Alias for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Config file (default: ./critpath.toml).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json)
    }

    fn load_config(&self) -> anyhow::Result<ProjectConfig> {
        match &self.config {
            Some(path) => load_config(path),
            None => load_project_config(&env::current_dir()?),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Analyse every dataset in a directory",
        long_about = "Analyse every *.json dataset in DATA_DIR (sorted by name), writing \
                      <stem>.json reports and summary.csv into RESULTS_DIR. An empty data \
                      directory is first filled with the standard generated suite.",
        after_help = "EXAMPLES:\n    # Use ./data and ./results\n    critpath run\n\n    # Explicit directories, no generation\n    critpath run datasets out --no-generate\n\n    # Emit machine-readable output\n    critpath run --json"
    )]
    Run(cmd::run::RunArgs),

    #[command(
        about = "Analyse one dataset",
        long_about = "Analyse one dataset file and print components, orders, the critical \
                      path and the shortest path.",
        after_help = "EXAMPLES:\n    # Human-readable report\n    critpath analyze data/small_cycles.json\n\n    # Nearest shortest-path target, with counters\n    critpath analyze data/small_cycles.json --shortest-target nearest --counters\n\n    # Emit machine-readable output\n    critpath analyze data/small_cycles.json --json"
    )]
    Analyze(cmd::analyze::AnalyzeArgs),

    #[command(
        about = "Write the standard dataset suite",
        after_help = "EXAMPLES:\n    # Write into ./data with the configured seed\n    critpath generate\n\n    # Custom directory and seed\n    critpath generate /tmp/graphs --seed 7"
    )]
    Generate(cmd::generate::GenerateArgs),

    #[command(
        about = "Print a dataset's condensation as Graphviz DOT",
        after_help = "EXAMPLES:\n    # Render with graphviz\n    critpath dot data/large_dense.json | dot -Tsvg > condensation.svg"
    )]
    Dot(cmd::dot::DotArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("CRITPATH_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "critpath=debug,info"
        } else {
            "critpath=info,warn"
        })
    });

    let format = env::var("CRITPATH_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let timing_enabled = cli.timing || timing::timing_enabled_from_env();
    timing::set_timing_enabled(timing_enabled);
    timing::clear_timings();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let output = cli.output_mode();
    let config = match cli.load_config() {
        Ok(config) => config,
        Err(err) => {
            render_error(
                output,
                &CliError::with_code(format!("{err:#}"), ErrorCode::ConfigParseError),
            )?;
            return Err(err);
        }
    };

    let command_result = match &cli.command {
        Commands::Run(args) => {
            timing::timed("cmd.run", || cmd::run::run_batch(args, &config, output))
        }
        Commands::Analyze(args) => timing::timed("cmd.analyze", || {
            cmd::analyze::run_analyze(args, &config, output)
        }),
        Commands::Generate(args) => timing::timed("cmd.generate", || {
            cmd::generate::run_generate(args, &config, output)
        }),
        Commands::Dot(args) => timing::timed("cmd.dot", || cmd::dot::run_dot(args, output)),
    };

    if timing_enabled {
        let report = timing::collect_report();
        if report.is_empty() {
            eprintln!("timing report: no samples recorded");
        } else {
            eprintln!("timing report:");
            eprintln!("{}", report.display_table());
            eprintln!("timing report (json):");
            eprintln!("{}", serde_json::to_string_pretty(&report.to_json())?);
        }
    }

    command_result
}
