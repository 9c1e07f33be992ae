use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use pipeline_compare::prelude::*;

#[derive(Parser)]
#[command(name = "pipeline_compare")]
#[command(version, about = "Compare the output files of two pipeline versions", long_about = None)]
struct Cli {
    /// TOML file listing the stages and glob pairs to compare
    config: PathBuf,

    /// Override the legacy results directory
    #[arg(long)]
    reference_root: Option<PathBuf>,

    /// Override the reimplementation results directory
    #[arg(long)]
    candidate_root: Option<PathBuf>,

    /// Trailing characters of each path shown per result line
    #[arg(short, long)]
    width: Option<usize>,

    /// Digest algorithm used to compare content
    #[arg(short, long, value_enum)]
    algorithm: Option<DigestAlgorithm>,

    /// What to do when a reference file has no candidate
    #[arg(long, value_enum)]
    on_missing: Option<MissingCandidate>,

    /// Also write all results as JSON to this file
    #[arg(long)]
    json_report: Option<PathBuf>,

    /// Run in batch mode (no progress spinner)
    #[arg(long)]
    batch: bool,

    /// Verbose logging on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut plan = ComparisonPlan::load(&cli.config)?;
    if let Some(root) = cli.reference_root {
        plan.reference_root = root;
    }
    if let Some(root) = cli.candidate_root {
        plan.candidate_root = root;
    }
    if let Some(width) = cli.width {
        plan.display_width = width;
    }
    if let Some(algorithm) = cli.algorithm {
        plan.algorithm = algorithm;
    }
    if let Some(on_missing) = cli.on_missing {
        plan.on_missing_candidate = on_missing;
    }
    plan.validate()
        .with_context(|| format!("Invalid settings for {}", cli.config.display()))?;

    info!(
        reference_root = %plan.reference_root.display(),
        candidate_root = %plan.candidate_root.display(),
        algorithm = %plan.algorithm,
        comparisons = plan.comparison_count(),
        "starting comparison run"
    );

    let progress = if cli.batch {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {pos} file(s) compared {msg}")
                .context("Invalid progress template")?,
        );
        pb.enable_steady_tick(Duration::from_millis(120));
        pb
    };

    let comparator = comparator_for(&plan);
    let mut reporter = ReportWriter::new(io::stdout().lock(), plan.display_width);
    let sections = run_plan(&plan, &comparator, &mut reporter, &progress);
    progress.finish_and_clear();
    let sections = sections?;

    if let Some(ref json_path) = cli.json_report {
        write_json_report(json_path, &plan.algorithm.to_string(), &sections)?;
        info!(path = %json_path.display(), "JSON report written");
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise the level follows `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init()
        .ok();
}
