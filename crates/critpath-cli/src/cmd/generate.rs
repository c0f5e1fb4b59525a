//! `critpath generate`: write the standard dataset suite.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use critpath_core::config::ProjectConfig;
use serde::Serialize;

use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Target directory (default: `run.data_dir` from config).
    pub dir: Option<PathBuf>,

    /// Generator seed (default: `generate.seed` from config).
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct GenerateOutput {
    pub dir: PathBuf,
    pub seed: u64,
    pub files: Vec<PathBuf>,
}

/// Execute `critpath generate`.
pub fn run_generate(
    args: &GenerateArgs,
    config: &ProjectConfig,
    output: OutputMode,
) -> anyhow::Result<()> {
    let dir = args.dir.clone().unwrap_or_else(|| config.run.data_dir.clone());
    let seed = args.seed.unwrap_or(config.generate.seed);
    let files = critpath_sim::write_suite(&dir, seed)?;

    let payload = GenerateOutput { dir, seed, files };
    render_mode(output, &payload, render_text, render_pretty)
}

fn render_text(out: &GenerateOutput, w: &mut dyn Write) -> io::Result<()> {
    for file in &out.files {
        writeln!(w, "{}", file.display())?;
    }
    Ok(())
}

fn render_pretty(out: &GenerateOutput, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Generated datasets")?;
    pretty_kv(w, "Directory", out.dir.display().to_string())?;
    pretty_kv(w, "Seed", out.seed.to_string())?;
    for file in &out.files {
        writeln!(w, "  ✓ {}", file.display())?;
    }
    Ok(())
}
