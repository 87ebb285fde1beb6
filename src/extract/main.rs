//! Feature extraction pipeline.
//!
//! Loads a region's road and POI snapshots, derives spatial descriptors for
//! every POI, and writes one JSON document per line.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use linden::batch::{default_workers, run_batch, BatchOptions};
use linden::config::Config;
use linden::engine::FeatureEngine;
use linden::graph::load_road_graph;
use linden::models::poi::load_poi_table;
use linden::neighborhoods::load_neighborhoods;
use linden::sink::JsonLinesSink;

#[derive(Parser, Debug)]
#[command(name = "extract")]
#[command(about = "Extract spatial feature documents for a region's POIs")]
struct Args {
    /// Config file with engine settings and the region registry
    #[arg(short, long, default_value = "linden.toml")]
    config: PathBuf,

    /// Region to extract, as named in the config
    #[arg(short, long)]
    region: String,

    /// Output JSON-lines file
    #[arg(short, long, default_value = "features.jsonl")]
    output: PathBuf,

    /// Worker threads (0 = all cores but one)
    #[arg(long, default_value = "0")]
    workers: usize,

    /// POIs handed to a worker at a time
    #[arg(long, default_value = "50")]
    batch_size: usize,
}

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let started = Instant::now();

    info!("Linden feature extraction");
    info!("Config: {}", args.config.display());

    let config = Config::load_from_file(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;
    let region = config.region(&args.region)?;
    info!("Region: {}", region.name);

    let graph = load_road_graph(&region.road_nodes, &region.road_edges)
        .context("Failed to load road snapshot")?;
    let neighborhoods = match &region.neighborhoods {
        Some(path) => load_neighborhoods(path).context("Failed to load neighborhoods")?,
        None => {
            warn!("no neighborhood file configured for {}", region.name);
            Vec::new()
        }
    };
    let pois = load_poi_table(&region.pois).context("Failed to load POI table")?;

    let engine = FeatureEngine::new(graph, neighborhoods, &pois, config.engine.clone())
        .context("Failed to build feature engine")?;

    let sink = JsonLinesSink::create(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;

    let options = BatchOptions {
        workers: if args.workers == 0 {
            default_workers()
        } else {
            args.workers
        },
        batch_size: args.batch_size,
    };
    info!(
        "Extracting {} POIs with {} workers...",
        pois.len(),
        options.workers
    );

    let pb = ProgressBar::new(pois.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})",
            )?
            .progress_chars("#>-"),
    );

    let summary = run_batch(&engine, &pois, &sink, &options, || pb.inc(1))?;
    pb.finish_with_message("Extraction complete");
    sink.finish()?;

    info!(
        "Done: {} documents written, {} POIs skipped, took {:.1?}",
        summary.processed,
        summary.failed,
        started.elapsed()
    );
    if summary.failed > 0 {
        warn!("{} POIs were skipped; see warnings above", summary.failed);
    }

    Ok(())
}
