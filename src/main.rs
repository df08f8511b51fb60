//! CLI entry point for the OC Transpo train feed rules.
//!
//! Provides subcommands for downloading the published feed, cleaning an
//! extracted feed directory, and trying individual rules on the command line.

use anyhow::Result;
use clap::{Parser, Subcommand};
use gtfs_agency_rules::config::RulesConfig;
use gtfs_agency_rules::feed::{Feed, Stop};
use gtfs_agency_rules::fetch::{BasicClient, download_to};
use gtfs_agency_rules::octranspo::OttawaOcTranspoTrainRules;
use gtfs_agency_rules::output::{append_record, print_json, print_pretty, write_feed};
use gtfs_agency_rules::pipeline;
use gtfs_agency_rules::rules::AgencyRules;
use gtfs_agency_rules::stats::CleanupStats;
use std::ffi::OsStr;
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "gtfs_agency_rules")]
#[command(about = "Cleans the OC Transpo O-Train GTFS feed", long_about = None)]
struct Cli {
    /// JSON rules config (falls back to $GTFS_RULES_CONFIG, then defaults)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the published feed archive
    Fetch {
        /// URL of the GTFS archive
        #[arg(value_name = "URL")]
        url: String,

        /// Where to save the archive
        #[arg(short, long, default_value = "feeds/gtfs.zip")]
        output: String,
    },
    /// Apply the rules to an extracted feed directory
    Clean {
        /// Directory holding routes.txt, trips.txt and stops.txt
        #[arg(value_name = "FEED_DIR")]
        input_dir: String,

        /// Directory to write the cleaned files to
        #[arg(short, long, default_value = "out")]
        output_dir: String,

        /// CSV file to append the run summary to
        #[arg(short, long, default_value = "runs.csv")]
        summary: String,

        /// Gzip compress the cleaned files
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
    /// Print cleaned stop names
    StopName {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Print cleaned trip headsigns
    Headsign {
        #[arg(required = true)]
        headsigns: Vec<String>,
    },
    /// Print the numeric ID derived for a stop
    StopId {
        /// Raw stop_id from the feed
        stop_id: String,

        /// stop_code from the feed
        #[arg(long, default_value = "")]
        code: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/gtfs_agency_rules.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("gtfs_agency_rules.log"));

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
    let config = RulesConfig::resolve(cli.config.as_deref())?;
    let rules = OttawaOcTranspoTrainRules::new(&config);

    match cli.command {
        Commands::Fetch { url, output } => {
            let client = BasicClient::new();
            download_to(&client, &url, Path::new(&output)).await?;
        }
        Commands::Clean {
            input_dir,
            output_dir,
            summary,
            gzip,
        } => {
            clean(&rules, &input_dir, &output_dir, &summary, gzip)?;
        }
        Commands::StopName { names } => {
            for name in &names {
                println!("{}", rules.clean_stop_name(name));
            }
        }
        Commands::Headsign { headsigns } => {
            for headsign in &headsigns {
                println!("{}", rules.clean_trip_headsign(headsign));
            }
        }
        Commands::StopId { stop_id, code } => {
            let stop = Stop {
                stop_id,
                stop_code: code,
                stop_name: String::new(),
                stop_lat: None,
                stop_lon: None,
            };
            println!("{}", rules.stop_id(&stop)?);
        }
    }

    Ok(())
}

/// Loads, cleans and writes one feed, logging a summary row either way.
#[tracing::instrument(skip(rules), fields(agency = rules.metadata().name))]
fn clean<R: AgencyRules>(
    rules: &R,
    input_dir: &str,
    output_dir: &str,
    summary: &str,
    gzip: bool,
) -> Result<()> {
    let result = Feed::read_dir(Path::new(input_dir))
        .and_then(|feed| pipeline::apply(rules, feed))
        .and_then(|cleaned| {
            write_feed(Path::new(output_dir), &cleaned, gzip)?;
            Ok(cleaned.stats)
        });

    match result {
        Ok(stats) => {
            let stats = stats.with_source(input_dir);
            print_pretty(&stats);
            print_json(&stats)?;
            append_record(summary, &stats)?;
            info!(output_dir, "Feed cleanup complete");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Feed cleanup failed");
            let stats = CleanupStats::from_error(
                rules.metadata().name,
                "cleanup_error",
                &format!("{e:#}"),
            )
            .with_source(input_dir);
            append_record(summary, &stats)?;
            Err(e)
        }
    }
}
