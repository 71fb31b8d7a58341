use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{debug, warn};

use th_core::capacity_from_arg;
use th_core::config::RunConfig;
use th_runtime::{init_tracing, scan_file, ScanReport};

const PROMPT: &str = "Enter the file for processing (submit with <enter>): ";

/// Print the labels with the largest values from a `<label> <value>` file.
#[derive(Debug, Parser)]
#[command(name = "top_hits", version)]
struct Args {
    /// Number of results to print [default: 10]
    #[arg(short = 'r', long = "results", allow_negative_numbers = true)]
    results: Option<i64>,

    /// JSON config file; command line flags take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print a JSON metrics line on stderr after the run
    #[arg(long)]
    metrics: bool,

    /// Input file; prompted for on stdin when omitted
    file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing();
    run(args, io::stdin().lock(), io::stdout().lock())
}

/// Resolve the run settings, scan the input file and print the report to `out`.
fn run<R: BufRead, W: Write>(args: Args, input: R, mut out: W) -> Result<()> {
    let config = resolve_config(&args)?;
    let capacity = capacity_from_arg(requested_results(&args, &config))?;
    debug!(%capacity, "resolved result count");

    let path = match args.file {
        Some(path) => path,
        None => prompt_for_path(input, &mut out)?,
    };

    let report = scan_file(&path, capacity)?;
    finish(report, &config, &path, out)
}

/// Print the report, then surface a read failure so the exit status is non-zero.
fn finish<W: Write>(report: ScanReport, config: &RunConfig, path: &Path, out: W) -> Result<()> {
    write_report(out, &config.header, &report.labels)?;
    if config.emit_metrics {
        eprintln!(
            "{}",
            report.metrics.to_json_line("top_hits", Some(report.elapsed))
        );
    }

    if let Some(err) = report.read_error {
        warn!("results above are partial");
        return Err(err).with_context(|| partial_read_message(path));
    }
    Ok(())
}

/// Merge the optional config file with command line overrides.
fn resolve_config(args: &Args) -> Result<RunConfig> {
    let mut config = match &args.config {
        Some(path) => RunConfig::load(path)
            .with_context(|| format!("cannot load config '{}'", path.display()))?,
        None => RunConfig::default(),
    };
    if args.metrics {
        config.emit_metrics = true;
    }
    Ok(config)
}

/// Result count as typed by the user, falling back to the config value.
fn requested_results(args: &Args, config: &RunConfig) -> i64 {
    args.results
        .unwrap_or_else(|| i64::try_from(config.results).unwrap_or(i64::MAX))
}

fn prompt_for_path<R: BufRead, W: Write>(mut input: R, mut output: W) -> Result<PathBuf> {
    output.write_all(PROMPT.as_bytes())?;
    output.flush()?;

    let mut answer = String::new();
    input
        .read_line(&mut answer)
        .context("failed to read file name from stdin")?;
    let answer = answer.trim();
    if answer.is_empty() {
        bail!("no input file provided");
    }
    Ok(PathBuf::from(answer))
}

fn write_report<W: Write>(mut out: W, header: &str, labels: &[String]) -> io::Result<()> {
    writeln!(out, "{header}")?;
    for label in labels {
        writeln!(out, "{label}")?;
    }
    out.flush()
}

fn partial_read_message(path: &Path) -> String {
    format!("reading '{}' stopped early; results are partial", path.display())
}
