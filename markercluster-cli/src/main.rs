//! MarkerCluster CLI - Command-line interface
//!
//! Exercises the clustering library from the terminal: load or generate a
//! marker set, feed it a viewport region, and print the aggregates a map
//! renderer would draw. Optionally simulates a cluster tap to show the
//! resulting camera intent.

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use markercluster::config::{self, ClusterConfig};
use markercluster::controller::{ClusterOutput, ClusterState};
use markercluster::geo::{zoom_from_region, Region};
use markercluster::marker::RawMarker;
use markercluster::presentation::bucket_for_aggregate;

#[derive(Parser)]
#[command(name = "markercluster")]
#[command(version = markercluster::VERSION)]
#[command(about = "Cluster map markers for a viewport region", long_about = None)]
struct Args {
    /// JSON file with markers: [{"latitude": .., "longitude": ..}, ..]
    #[arg(long)]
    markers: Option<PathBuf>,

    /// Number of random markers to generate when no file is given
    #[arg(long, default_value = "100")]
    count: usize,

    /// Seed for random marker generation
    #[arg(long, default_value = "1")]
    seed: u64,

    /// Latitude range for generated markers, as min,max
    #[arg(long, default_value = "48,56", value_parser = parse_range)]
    lat_range: (f64, f64),

    /// Longitude range for generated markers, as min,max
    #[arg(long, default_value = "14,24", value_parser = parse_range)]
    lon_range: (f64, f64),

    /// Viewport center latitude in decimal degrees
    #[arg(long, default_value = "52.5")]
    lat: f64,

    /// Viewport center longitude in decimal degrees
    #[arg(long, default_value = "19.2")]
    lon: f64,

    /// Viewport latitude span in degrees
    #[arg(long, default_value = "8.5")]
    lat_delta: f64,

    /// Viewport longitude span in degrees
    #[arg(long, default_value = "8.5")]
    lon_delta: f64,

    /// Screen width in pixels, used for zoom derivation
    #[arg(long, default_value = "360")]
    screen_width: f64,

    /// Config file path (defaults to ~/.markercluster/config.ini)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulate a tap on the Nth printed aggregate and show the camera move
    #[arg(long)]
    tap: Option<usize>,

    /// Skip log file creation
    #[arg(long)]
    no_log: bool,
}

fn parse_range(value: &str) -> Result<(f64, f64), String> {
    let parts: Vec<&str> = value.split(',').collect();
    if parts.len() != 2 {
        return Err("expected min,max".to_string());
    }
    let min: f64 = parts[0].trim().parse().map_err(|_| "invalid number")?;
    let max: f64 = parts[1].trim().parse().map_err(|_| "invalid number")?;
    if min >= max {
        return Err("min must be below max".to_string());
    }
    Ok((min, max))
}

fn load_markers(args: &Args) -> Result<Vec<RawMarker>, String> {
    if let Some(path) = &args.markers {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
        return serde_json::from_str(&content)
            .map_err(|e| format!("cannot parse {}: {}", path.display(), e));
    }

    let mut rng = StdRng::seed_from_u64(args.seed);
    Ok((0..args.count)
        .map(|_| {
            RawMarker::new(
                rng.random_range(args.lat_range.0..args.lat_range.1),
                rng.random_range(args.lon_range.0..args.lon_range.1),
            )
        })
        .collect())
}

fn load_config(args: &Args) -> Result<ClusterConfig, String> {
    let mut cfg = match &args.config {
        Some(path) => config::load_from(path).map_err(|e| e.to_string())?,
        None => config::load_default().map_err(|e| e.to_string())?,
    };
    cfg.screen_width_px = args.screen_width;
    // A tap simulation only makes sense with zoom interaction on.
    if args.tap.is_some() {
        cfg.camera.zoom_enabled = true;
    }
    Ok(cfg)
}

fn run(args: &Args) -> Result<(), String> {
    let cfg = load_config(args)?;
    let markers = load_markers(args)?;
    let region = Region::new(args.lat, args.lon, args.lat_delta, args.lon_delta);

    info!(
        markers = markers.len(),
        zoom = zoom_from_region(&region, cfg.screen_width_px),
        "clustering viewport"
    );

    let state: ClusterState = ClusterState::new()
        .on_markers_changed(markers, &cfg)
        .on_region_changed(region, &cfg);

    let aggregates = match state.output() {
        ClusterOutput::Clustered(aggregates) => aggregates,
        ClusterOutput::Passthrough(markers) => {
            println!("clustering off; {} markers pass through unchanged", markers.len());
            return Ok(());
        }
        ClusterOutput::Empty => {
            println!("nothing to show (zoom in to see markers)");
            return Ok(());
        }
    };

    println!("{} aggregates in viewport:", aggregates.len());
    for (position, aggregate) in aggregates.iter().enumerate() {
        if aggregate.is_cluster() {
            let bucket = bucket_for_aggregate(aggregate, &cfg.style);
            println!(
                "  [{position}] badge {} at {}  {}x{} px, font {} px",
                aggregate.label(),
                aggregate.centroid,
                bucket.width,
                bucket.height,
                bucket.font_size,
            );
        } else {
            println!(
                "  [{position}] leaf marker #{} at {}",
                aggregate.source_indices[0], aggregate.centroid,
            );
        }
    }

    if let Some(position) = args.tap {
        let aggregate = aggregates
            .get(position)
            .ok_or_else(|| format!("--tap {}: no such aggregate", position))?;
        let activation = state.activate(aggregate, &cfg);
        match activation.camera {
            Some(camera) => println!(
                "tap [{position}] -> animate camera to {} at zoom {:.2} over {} ms",
                camera.center, camera.zoom, camera.duration_ms,
            ),
            None => println!("tap [{position}] reported, zoom interaction disabled"),
        }
    }

    Ok(())
}

fn main() {
    let args = Args::parse();

    let _guard = if args.no_log {
        None
    } else {
        match markercluster::logging::init_logging(
            markercluster::logging::DEFAULT_LOG_DIR,
            markercluster::logging::DEFAULT_LOG_FILE,
        ) {
            Ok(guard) => Some(guard),
            Err(e) => {
                eprintln!("warning: logging disabled: {}", e);
                None
            }
        }
    };

    if let Err(message) = run(&args) {
        eprintln!("error: {}", message);
        process::exit(1);
    }
}
