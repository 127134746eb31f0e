// src/main.rs
//! NMEA Mapper - convert NMEA GPS logs into map-ready track documents

use anyhow::{Context, Result};
use clap::Parser;
use nmea_mapper::*;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// NMEA log file to convert
    input: PathBuf,
    /// Output format: json, geojson, gpx, kml or csv
    #[arg(short, long, default_value = "json")]
    format: TrackFormat,
    /// Write to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Override the configured input size limit in bytes
    #[arg(long)]
    max_bytes: Option<usize>,
    /// Print a track summary to stderr
    #[arg(short, long)]
    summary: bool,
    /// Configuration file to use instead of the default location
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn load_config(cli: &Cli) -> Result<MapperConfig> {
    let mut config = match &cli.config {
        Some(path) => MapperConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => MapperConfig::load().unwrap_or_else(|e| {
            warn!("Using default configuration: {}", e);
            MapperConfig::default()
        }),
    };

    if let Some(limit) = cli.max_bytes {
        config.update_max_input_bytes(limit);
    }
    config.validate()?;
    Ok(config)
}

fn print_summary(track: &TrackResult, stats: &ParseStats, config: &MapperConfig) {
    let summary = track.summary();
    let view = MapView::for_track(track, config);

    eprintln!("Lines:       {}", stats.lines);
    eprintln!(
        "Sentences:   {} ({} malformed, {} at origin)",
        stats.sentences, stats.malformed, stats.degenerate
    );
    eprintln!("Points:      {}", summary.points);
    match track.bounds() {
        Some(b) => eprintln!(
            "Bounds:      {:.6},{:.6} .. {:.6},{:.6}",
            b.min_lat, b.min_lon, b.max_lat, b.max_lon
        ),
        None => eprintln!("Bounds:      none (default view)"),
    }
    eprintln!(
        "View:        {:.6},{:.6} zoom {}",
        view.latitude, view.longitude, view.zoom
    );
    eprintln!("Distance:    {:.2} km", summary.distance_km());
    eprintln!("Duration:    {}", summary.format_duration());
    if let Some(speed) = summary.average_speed() {
        eprintln!("Avg speed:   {:.1} km/h", speed);
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let raw = std::fs::read(&cli.input)
        .with_context(|| format!("Failed to read {}", cli.input.display()))?;

    let parser = TrackParser::new().with_max_input_bytes(config.max_input_bytes);
    let (track, stats) = parser
        .parse_with_stats(&raw)
        .with_context(|| format!("Failed to parse {}", cli.input.display()))?;

    if cli.summary {
        print_summary(&track, &stats, &config);
    }

    let exporter = TrackExporter::new(&track);
    match &cli.output {
        Some(path) => {
            exporter
                .export_to_file(path, cli.format)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(
                "Wrote {} points as {} to {}",
                track.len(),
                cli.format.display_name(),
                path.display()
            );
        }
        None => {
            let content = exporter.export(cli.format)?;
            println!("{}", content);
        }
    }

    Ok(())
}
