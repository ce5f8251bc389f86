//! CLI entry point for the vaccine map statistics tool.
//!
//! Provides subcommands for aggregating a snapshot document into the map
//! aggregate, exporting the per-region detail table, and printing national
//! headline statistics.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use vaccine_map_stats::{
    engine::aggregate::aggregate,
    headline::{
        DEFAULT_POPULATION, national_totals, project_completion, uptake, weekly_difference,
    },
    output::{print_json, write_aggregate_json, write_region_table},
    snapshot::{SnapshotSeries, parse_series},
};

#[derive(Parser)]
#[command(name = "vaccine_map_stats")]
#[command(about = "Derive choropleth map metrics from weekly vaccination snapshots", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate a snapshot document into the map aggregate
    Aggregate {
        /// Path to the snapshot JSON document
        #[arg(value_name = "FILE")]
        input: String,

        /// File to write the aggregate JSON to; logs it when omitted
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Export the per-region detail table as CSV
    Table {
        /// Path to the snapshot JSON document
        #[arg(value_name = "FILE")]
        input: String,

        /// CSV file to write the table to
        #[arg(short, long, default_value = "regions.csv")]
        output: String,
    },
    /// Print national headline statistics
    Headline {
        /// Path to the snapshot JSON document
        #[arg(value_name = "FILE")]
        input: String,

        /// National population used for uptake percentages
        #[arg(long, default_value_t = DEFAULT_POPULATION)]
        population: u64,
    },
}

fn main() -> Result<()> {
    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/vaccine_map_stats.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("vaccine_map_stats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Aggregate { input, output } => {
            let series = load_series(&input)?;
            match aggregate(&series) {
                Some(agg) => {
                    info!(
                        last_updated = %agg.last_updated,
                        regions = agg.regions.len(),
                        "Snapshot series aggregated"
                    );
                    match output {
                        Some(path) => write_aggregate_json(&path, &agg)?,
                        None => print_json(&agg)?,
                    }
                }
                None => info!("Snapshot document contains no weeks"),
            }
        }
        Commands::Table { input, output } => {
            let series = load_series(&input)?;
            match aggregate(&series) {
                Some(agg) => {
                    write_region_table(&output, &agg)?;
                    info!(output, regions = agg.regions.len(), "Region table written");
                }
                None => info!("Snapshot document contains no weeks"),
            }
        }
        Commands::Headline { input, population } => {
            let series = load_series(&input)?;
            let totals = national_totals(&series);

            let difference = weekly_difference(&totals);
            info!(
                value = difference.value,
                percent = difference.percent,
                direction = ?difference.direction,
                "First doses vs prior week"
            );

            let overall = uptake(&totals, population);
            info!(
                cumulative = overall.cumulative,
                percent = overall.percent,
                one_in = overall.one_in,
                "Overall first-dose uptake"
            );

            match totals
                .first()
                .and_then(|latest| project_completion(latest, Utc::now().date_naive()))
            {
                Some(projection) => info!(
                    first_four = %projection.first_four,
                    first_six = %projection.first_six,
                    "Projected cohort completion at the current pace"
                ),
                None => info!("No weekly pace to project from"),
            }
        }
    }

    Ok(())
}

/// Loads and parses a snapshot document from a local file.
fn load_series(path: &str) -> Result<SnapshotSeries> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    let series = parse_series(&text)?;
    info!(path, weeks = series.len(), "Snapshot document loaded");
    Ok(series)
}
