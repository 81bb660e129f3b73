//! Covenant Scan Binary
//!
//! Runs the covenant violation scan described by a TOML configuration over a
//! local filing cache and reports the results.

use anyhow::Context;
use clap::Parser;
use covenant_engine::{DatasetAggregator, FilingAnalyzer, LocalCacheSource};
use covenant_scan::{seed, CheckpointWriter, Config, OutputFormat, Reporter, ScanResults};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "covenant-scan")]
#[command(
    version,
    about = "Scan EDGAR 10-K/10-Q filings for loan-covenant violation mentions"
)]
struct Args {
    /// Path to the TOML scan configuration
    #[arg(short, long, default_value = "covenant-scan.toml")]
    config: PathBuf,

    /// Override the filing cache directory
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Output format: console, json, json-pretty or markdown
    #[arg(short, long, default_value = "console")]
    format: String,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory for per-entity checkpoint files, removed at the end
    #[arg(long)]
    checkpoint_dir: Option<PathBuf>,

    /// Override the sampling seed
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout carries only the report
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting covenant-scan v{}", env!("CARGO_PKG_VERSION"));

    let format: OutputFormat = args.format.parse()?;
    let mut config = Config::from_file(&args.config)?;
    if let Some(cache_dir) = args.cache_dir {
        config.scan.cache_dir = cache_dir;
    }
    if let (Some(seed), Some(sampled)) = (args.seed, config.sampled.as_mut()) {
        sampled.seed = Some(seed);
    }

    let mut datasets = config.datasets.clone();
    if let Some(sampled) = &config.sampled {
        let dataset = seed::sampled_dataset(sampled, &config.datasets)
            .context("Failed to build sampled dataset")?;
        datasets.push(dataset);
    }
    tracing::info!(
        datasets = datasets.len(),
        cache_dir = %config.scan.cache_dir.display(),
        "Scan configured"
    );

    let source = LocalCacheSource::new(&config.scan.cache_dir);
    let aggregator = DatasetAggregator::new(source, FilingAnalyzer::new(config.analyzer_config()));
    let checkpoints = args.checkpoint_dir.map(CheckpointWriter::new);

    let started_at = chrono::Utc::now();
    let aggregation = aggregator.run_with(&datasets, &config.scan.filing_types, |progress, totals| {
        if let Some(writer) = &checkpoints {
            if let Err(e) = writer.write(progress.position, totals) {
                tracing::warn!("Failed to write checkpoint for cik={}: {:#}", progress.entity_id, e);
            }
        }
    });

    let results = ScanResults::new(started_at, &datasets, &config.scan.filing_types, aggregation);
    let reporter = Reporter::new(format);
    match &args.output {
        Some(path) => {
            reporter
                .write_to_file(&results, path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            tracing::info!("Report written to {}", path.display());
        }
        None => reporter.report(&results)?,
    }

    if let Some(writer) = &checkpoints {
        let removed = writer.cleanup()?;
        tracing::debug!(removed, "Checkpoints removed");
    }

    Ok(())
}
