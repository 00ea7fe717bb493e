//! Host right-sizing CLI
//!
//! Classifies hosts from New Relic utilization data, recommends the cheapest
//! instance size from the configured catalog and forecasts disk usage.

mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{catalog, report};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Host right-sizing CLI
#[derive(Parser)]
#[command(name = "rightsize")]
#[command(author, version, about = "Host right-sizing and disk forecast reports", long_about = None)]
pub struct Cli {
    /// Path to the YAML configuration file (defaults to ./config.yaml)
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    /// Enable verbose output
    #[arg(long, short)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch metrics from New Relic and print the sizing report
    Report {
        /// Write run metrics in Prometheus text format to this file
        #[arg(long)]
        metrics_file: Option<PathBuf>,
    },

    /// Build the sizing report from saved NerdGraph responses
    Analyze {
        /// SystemSample query response (JSON)
        #[arg(long)]
        system: PathBuf,

        /// StorageSample query response (JSON)
        #[arg(long)]
        storage: PathBuf,

        /// Write run metrics in Prometheus text format to this file
        #[arg(long)]
        metrics_file: Option<PathBuf>,
    },

    /// Show the configured size catalog
    Catalog,
}

fn init_tracing(verbose: bool, json: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    let settings = config::Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Report { metrics_file } => {
            report::run_report(&settings, metrics_file.as_deref(), cli.format).await?;
        }
        Commands::Analyze {
            system,
            storage,
            metrics_file,
        } => {
            report::analyze_files(&settings, &system, &storage, metrics_file.as_deref(), cli.format)
                .await?;
        }
        Commands::Catalog => {
            catalog::show_catalog(&settings, cli.format)?;
        }
    }

    Ok(())
}
