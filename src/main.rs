use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use env_logger::Builder;
use log::{LevelFilter, debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use std::path::PathBuf;

use crate::common::{AnalyzerConfig, ElementId, load_dataset};
use crate::coverage::{CoverageAnalyzer, CoverageError};

mod common;
mod coverage;
mod report;

/// Coverage statistics and point queries for simulated cellular networks.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file with base stations, antennas, and grid bounds.
    dataset: String,

    /// TOML config file (defaults to config.toml beside the dataset).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print results as JSON instead of text.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Statistics over the whole network.
    Global,
    /// Statistics for one base station (random if no id is given).
    Station {
        id: Option<String>,
        /// Seed for random station selection.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Antennas covering a point, or the nearest covered point.
    Point {
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        #[arg(allow_negative_numbers = true)]
        lon: f64,
    },
}

fn load_config(args: &Args) -> anyhow::Result<AnalyzerConfig> {
    let config = match &args.config {
        Some(path) => AnalyzerConfig::load(path),
        None => AnalyzerConfig::load_or_default(&AnalyzerConfig::config_path_from_dataset(&args.dataset)),
    };
    config.map_err(|e| anyhow!(e))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value).context("Failed to serialize result")?);
    Ok(())
}

fn run(args: Args, config: AnalyzerConfig) -> anyhow::Result<()> {
    let analyzer = CoverageAnalyzer::new(load_dataset(&args.dataset)?);
    info!(
        "Loaded {} base stations and {} antennas from {}",
        analyzer.dataset().base_stations.len(),
        analyzer.dataset().num_antennas(),
        args.dataset
    );

    match args.command {
        Command::Global => {
            let stats = analyzer.global_statistics()?;
            if args.json {
                print_json(&stats)?;
            } else {
                print!("{}", report::render_stats(&stats, config.decimals));
            }
        }
        Command::Station { id, seed } => {
            let station_id = id.as_deref().map(ElementId::parse);
            let mut rng = match seed.or(config.station_seed) {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let stats = analyzer.station_statistics(station_id.as_ref(), &mut rng).inspect_err(|e| {
                if matches!(e, CoverageError::NotFound(_)) {
                    let known: Vec<String> = analyzer.station_ids().iter().map(|id| id.to_string()).collect();
                    warn!("Known base stations: {}", known.join(", "));
                }
            })?;
            if args.json {
                print_json(&stats)?;
            } else {
                print!("{}", report::render_stats(&stats, config.decimals));
            }
        }
        Command::Point { lat, lon } => {
            let answer = analyzer.point_coverage(lat, lon)?;
            if args.json {
                print_json(&answer)?;
            } else {
                print!("{}", report::render_coverage(lat, lon, &answer));
            }
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    // Logging setup
    let crate_level = config.level_filter().map_err(|e| anyhow!(e))?.unwrap_or(LevelFilter::Debug);
    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter(Some("coverage_analyzer"), crate_level)
        .init();

    debug!("Using config {:?}", config);
    run(args, config)
}
