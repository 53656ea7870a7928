//! CLI entry point for the dashboard asset generator.

use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use ehs_analytics::config::{
    DEFAULT_INCIDENTS_PATH, DEFAULT_OBSERVATIONS_PATH, DEFAULT_OUTPUT_DIR,
};
use ehs_analytics::{AssetGenerator, GeneratorConfig};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Generate static dashboard analytics assets (JSON + charts)",
    long_about = "Generates the summary document and chart images consumed by the web dashboard.\n\n\
                  EXAMPLES:\n  \
                  # Defaults (data/*.csv -> public/dashboard-assets)\n  \
                  ehs-analytics\n\n  \
                  # Explicit inputs and output directory\n  \
                  ehs-analytics --observations obs.csv --incidents inc.csv -o assets/\n\n  \
                  # Machine-readable output\n  \
                  ehs-analytics --json | jq .model.accuracy"
)]
struct Args {
    /// Path to the observations CSV
    #[arg(long, default_value = DEFAULT_OBSERVATIONS_PATH)]
    observations: String,

    /// Path to the incidents CSV
    #[arg(long, default_value = DEFAULT_INCIDENTS_PATH)]
    incidents: String,

    /// Output directory under the web app
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    outdir: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings and errors)
    #[arg(short, long)]
    quiet: bool,

    /// Print the summary document to stdout as JSON
    ///
    /// Disables all progress logs so stdout carries only the JSON.
    #[arg(long)]
    json: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, args.quiet, args.json);
    dotenv().ok();

    let config = GeneratorConfig::builder()
        .observations_path(&args.observations)
        .incidents_path(&args.incidents)
        .output_dir(&args.outdir)
        .build();

    info!("Generating dashboard assets into {}", args.outdir);
    let summary = AssetGenerator::new(config).run()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if let Some(accuracy) = summary.model.accuracy {
        info!("Risk model holdout accuracy: {:.3}", accuracy);
    }

    Ok(())
}
