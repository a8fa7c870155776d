//! CLI entry point for the NYC 311 statistics engine.
//!
//! Each subcommand loads the data file(s) behind one dashboard
//! visualization, runs its aggregation pipeline, and writes the resulting
//! chart document as JSON, optionally publishing it to S3.

use anyhow::{Result, anyhow};
use clap::{Args, Parser, Subcommand, ValueEnum};
use nyc311_stats::analyzers::analyzer::{
    FEATURED_AGENCIES, RACE_TOP_N, agency_race, borough_summary, borough_time_series,
    complaint_type_bump, cover_summary, resolution_series,
};
use nyc311_stats::analyzers::covid::covid_section;
use nyc311_stats::analyzers::types::{Envelope, Filter, ViewMode};
use nyc311_stats::analyzers::writetos3::write_json_to_s3;
use nyc311_stats::borough::Borough;
use nyc311_stats::boundaries::{REGION_PROPERTY, parse_boundaries};
use nyc311_stats::fetch::{BasicClient, join_source, load_or_empty, read_source};
use nyc311_stats::output::{print_json, print_pretty, write_csv, write_json};
use nyc311_stats::records::{
    AgencyMonthRow, BoroughMonthRow, ComplaintTypeRow, ResolutionRow, TopTypeRow, TypeCountRow,
};
use serde::Serialize;
use std::ffi::OsStr;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const TIME_SERIES_CSV: &str = "complaints_time_series.csv";
const TOP_TYPES_CSV: &str = "top_complaint_types.csv";
const TOP_AGENCIES_CSV: &str = "TopAgencies.csv";
const TOP_TYPES_GENERAL_CSV: &str = "top_10_complaint_types_general.csv";
const TOP_TYPES_BOROUGH_CSV: &str = "top_10_complaint_types.csv";
const TYPE_COUNTS_CSV: &str = "monthly_complaint_type_counts.csv";
const RESOLUTION_CSV: &str = "AvgResolutionPerAgency.csv";
const BOUNDARIES_GEOJSON: &str = "nyc_boroughs.geojson";

#[derive(Parser)]
#[command(name = "nyc311_stats")]
#[command(about = "Aggregates NYC 311 complaint data into chart documents", long_about = None)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CommonArgs {
    /// Directory or base URL holding the data files [env: DATA_DIR]
    #[arg(short, long, global = true)]
    data_dir: Option<String>,

    /// Write the JSON document here instead of stdout
    #[arg(short, long, global = true)]
    output: Option<String>,

    /// Optional: S3 bucket to publish the JSON document to
    #[arg(long, global = true)]
    s3_bucket: Option<String>,

    /// Object key for the S3 upload (defaults to charts/<chart>.json)
    #[arg(long, global = true)]
    s3_key: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Absolute,
    PerCapita,
}

#[derive(Subcommand)]
enum Commands {
    /// Overall totals, averages, monthly sparkline and top complaint types
    Cover,
    /// Per-borough totals, rates, medians and map colors
    Boroughs {
        /// Restrict to one borough (any spelling, e.g. "new york")
        #[arg(short, long)]
        borough: Option<String>,

        /// Restrict to one year (YYYY)
        #[arg(short, long)]
        year: Option<String>,

        /// Also write the per-borough table to this CSV file
        #[arg(long)]
        csv: Option<String>,
    },
    /// Monthly complaints per borough
    Timeseries {
        #[arg(short, long, value_enum, default_value_t = Mode::Absolute)]
        mode: Mode,
    },
    /// Top complaint types ranked per year, or per month within a year
    Bump {
        /// Use the borough-scoped file filtered to this borough
        #[arg(short, long)]
        borough: Option<String>,

        /// Drill down into the months of this year (YYYY)
        #[arg(short, long)]
        year: Option<String>,
    },
    /// Monthly agency bar race frames
    Agencies {
        /// Bars per month
        #[arg(short, long, default_value_t = RACE_TOP_N)]
        top: usize,
    },
    /// Pre / during / post COVID maps, word clouds and citywide rate
    Covid,
    /// Average resolution hours for the featured agencies
    Resolution,
    /// List regions in the borough boundary GeoJSON
    Boundaries {
        /// Feature property holding the region name
        #[arg(short, long, default_value = REGION_PROPERTY)]
        property: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/nyc311_stats.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("nyc311_stats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let common = cli.common;
    let data_dir = common
        .data_dir
        .clone()
        .or_else(|| std::env::var("DATA_DIR").ok())
        .unwrap_or_else(|| "public/data".to_string());
    let client = BasicClient::new();
    let source = |file: &str| join_source(&data_dir, file);

    info!(data_dir = %data_dir, "Data source");

    match cli.command {
        Commands::Cover => {
            let (series_src, types_src) = (source(TIME_SERIES_CSV), source(TOP_TYPES_CSV));
            let (series, types) = tokio::join!(
                load_or_empty::<BoroughMonthRow, _>(&client, &series_src),
                load_or_empty::<TopTypeRow, _>(&client, &types_src),
            );
            emit(&common, Envelope::new("cover", cover_summary(&series, &types))).await?;
        }
        Commands::Boroughs { borough, year, csv } => {
            let filter = Filter {
                borough: borough.as_deref().map(parse_borough).transpose()?,
                year,
            };
            let rows: Vec<BoroughMonthRow> = load_or_empty(&client, &source(TIME_SERIES_CSV)).await;
            let summary = borough_summary(&rows, &filter);
            print_pretty(&summary);

            if let Some(path) = csv {
                write_csv(&path, &summary.boroughs)?;
            }
            emit(&common, Envelope::new("boroughs", summary)).await?;
        }
        Commands::Timeseries { mode } => {
            let mode = match mode {
                Mode::Absolute => ViewMode::Absolute,
                Mode::PerCapita => ViewMode::PerCapita,
            };
            let rows: Vec<BoroughMonthRow> = load_or_empty(&client, &source(TIME_SERIES_CSV)).await;
            emit(&common, Envelope::new("timeseries", borough_time_series(&rows, mode))).await?;
        }
        Commands::Bump { borough, year } => {
            let borough = borough
                .as_deref()
                .map(parse_borough)
                .transpose()?
                .map(|b| b.csv_label().to_string());
            let file = if borough.is_some() {
                TOP_TYPES_BOROUGH_CSV
            } else {
                TOP_TYPES_GENERAL_CSV
            };
            let rows: Vec<ComplaintTypeRow> = load_or_empty(&client, &source(file)).await;
            let chart = complaint_type_bump(&rows, borough.as_deref(), year.as_deref());
            emit(&common, Envelope::new("bump", chart)).await?;
        }
        Commands::Agencies { top } => {
            let rows: Vec<AgencyMonthRow> = load_or_empty(&client, &source(TOP_AGENCIES_CSV)).await;
            emit(&common, Envelope::new("agencies", agency_race(&rows, top))).await?;
        }
        Commands::Covid => {
            let (series_src, types_src) = (source(TIME_SERIES_CSV), source(TYPE_COUNTS_CSV));
            // Independent loads; either may fail without affecting the other.
            let (series, types) = tokio::join!(
                load_or_empty::<BoroughMonthRow, _>(&client, &series_src),
                load_or_empty::<TypeCountRow, _>(&client, &types_src),
            );
            emit(&common, Envelope::new("covid", covid_section(&series, &types))).await?;
        }
        Commands::Resolution => {
            let rows: Vec<ResolutionRow> = load_or_empty(&client, &source(RESOLUTION_CSV)).await;
            let series = resolution_series(&rows, &FEATURED_AGENCIES);
            emit(&common, Envelope::new("resolution", series)).await?;
        }
        Commands::Boundaries { property } => {
            let bytes = read_source(&client, &source(BOUNDARIES_GEOJSON)).await?;
            let regions = parse_boundaries(&String::from_utf8_lossy(&bytes), &property)?;
            for region in regions.iter().filter(|r| r.borough.is_none()) {
                warn!(region = %region.name, "Boundary region matches no borough");
            }
            emit(&common, Envelope::new("boundaries", regions)).await?;
        }
    }

    Ok(())
}

fn parse_borough(raw: &str) -> Result<Borough> {
    Borough::canonicalize(raw).ok_or_else(|| anyhow!("unknown borough {raw:?}"))
}

/// Writes the document to `--output` or stdout, then to S3 when a bucket is set.
async fn emit<T: Serialize>(common: &CommonArgs, doc: Envelope<T>) -> Result<()> {
    match &common.output {
        Some(path) => write_json(path, &doc)?,
        None => print_json(&doc)?,
    }

    if let Some(bucket) = &common.s3_bucket {
        let key = common
            .s3_key
            .clone()
            .unwrap_or_else(|| format!("charts/{}.json", doc.chart));
        let config = aws_config::load_from_env().await;
        let s3 = aws_sdk_s3::Client::new(&config);
        write_json_to_s3(&s3, bucket, &key, &doc).await?;
    } else {
        info!("S3 bucket not specified, skipping upload");
    }

    Ok(())
}
