// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod grid;
pub mod logging;
pub mod types;

use std::fs;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::{load_with_overrides, SweepConfig};
use crate::exec::{BatchSummary, BoundedExecutor, CommandLauncher, JobResult};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - sweep file loading (+ CLI overrides) and grid validation
/// - dry-run listing, or
/// - the bounded executor over the expanded grid
/// - the batch summary (printing is a caller concern, so it lives here)
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_with_overrides(&args.config, &args.overrides())
        .with_context(|| format!("loading sweep file {:?}", args.config))?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    fs::create_dir_all(cfg.output_dir())
        .with_context(|| format!("creating output directory {:?}", cfg.output_dir()))?;

    let grid = cfg.grid();
    info!(
        jobs = grid.len(),
        concurrency = cfg.concurrency(),
        mode = ?cfg.launch_mode(),
        output_dir = ?cfg.output_dir(),
        "starting sweep"
    );

    let executor = BoundedExecutor::new(CommandLauncher::new(cfg.launch_mode()), cfg.concurrency())?;
    let results = executor.run(grid.expand()).await;

    print_summary(&results);
    Ok(())
}

/// Print the batch summary plus one line per job that did not exit 0.
fn print_summary(results: &[JobResult]) {
    let summary = BatchSummary::from_results(results);

    let mut failed: Vec<&JobResult> = results.iter().filter(|r| !r.succeeded()).collect();
    failed.sort_by_key(|r| r.spec.index());

    for result in failed {
        let path = result.spec.output_path().display();
        match &result.outcome {
            Ok(exit) => println!("  {path}: {exit}"),
            Err(e) => println!("  {path}: {e}"),
        }
    }
    println!("{summary}");

    if !summary.all_succeeded() {
        warn!(%summary, "sweep finished with failures");
    } else {
        info!(%summary, "sweep finished");
    }
}

/// Simple dry-run output: print settings and every job.
fn print_dry_run(cfg: &SweepConfig) {
    let grid = cfg.grid();

    println!("gridrun dry-run");
    println!("  sweep.cmd = {}", cfg.sweep().cmd);
    println!("  sweep.concurrency = {}", cfg.concurrency());
    println!("  sweep.launch_mode = {:?}", cfg.launch_mode());
    println!("  sweep.output_dir = {}", cfg.output_dir().display());
    println!("  naming key = {:?}", grid.naming_key());
    println!();

    println!("axes ({}):", grid.axes().len());
    for axis in grid.axes() {
        let values: Vec<String> = axis.values().iter().map(ToString::to_string).collect();
        println!("  - {} = [{}]", axis.name(), values.join(", "));
    }
    println!();

    println!("jobs ({}):", grid.len());
    for job in grid.expand() {
        println!("  {job}");
        println!("      cmd: {}", job.command());
        println!("      out: {}", job.output_path().display());
    }

    debug!("dry-run complete (no execution)");
}
