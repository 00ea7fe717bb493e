//! Report commands: fetch metrics, run the sizing engine, render the result

use anyhow::{Context, Result};
use colored::Colorize;
use sizing_lib::{
    ClassificationResult, DiskThresholds, FileSource, MetricsSource, NerdGraphClient, SizeMatch,
    SizingEngine, SizingMetrics, SizingReport, StructuredLogger,
};
use std::path::Path;
use tabled::Tabled;

use crate::config::Settings;
use crate::output::{
    color_disk, color_status, format_currency, format_percent, monthly_cost, print_success,
    print_warning, OutputFormat,
};

/// Row for the CPU analysis table
#[derive(Tabled)]
struct CpuRow {
    #[tabled(rename = "Hostname")]
    hostname: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "CPU % (Monthly)")]
    cpu_percent: String,
    #[tabled(rename = "Recommended Size")]
    recommended: String,
    #[tabled(rename = "Est Savings (Hourly)")]
    hourly: String,
    #[tabled(rename = "Est Savings (Monthly)")]
    monthly: String,
}

/// Row for the memory analysis table
#[derive(Tabled)]
struct MemoryRow {
    #[tabled(rename = "Hostname")]
    hostname: String,
    #[tabled(rename = "Mem Pct")]
    memory_percent: String,
    #[tabled(rename = "Recommended Size")]
    recommended: String,
    #[tabled(rename = "Est Savings (Hourly)")]
    hourly: String,
    #[tabled(rename = "Est Savings (Monthly)")]
    monthly: String,
}

/// Row for the disk forecast table
#[derive(Tabled)]
struct DiskRow {
    #[tabled(rename = "Hostname")]
    hostname: String,
    #[tabled(rename = "Current Utilization")]
    current: String,
    #[tabled(rename = "Week Estimate")]
    week: String,
    #[tabled(rename = "Month Estimate")]
    month: String,
    #[tabled(rename = "Quarter Estimate")]
    quarter: String,
    #[tabled(rename = "Recommended Disk Size")]
    recommended: String,
}

/// Fetch from New Relic and render the report
pub async fn run_report(
    settings: &Settings,
    metrics_file: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let (api_key, account_id) = settings.credentials()?;
    let source = NerdGraphClient::new(&settings.endpoint, api_key, account_id, settings.timeout())
        .context("Failed to create New Relic client")?;

    run_pipeline(settings, &source, metrics_file, format).await
}

/// Render the report from saved NerdGraph responses
pub async fn analyze_files(
    settings: &Settings,
    system: &Path,
    storage: &Path,
    metrics_file: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let source = FileSource::new(system, storage);
    run_pipeline(settings, &source, metrics_file, format).await
}

async fn run_pipeline(
    settings: &Settings,
    source: &dyn MetricsSource,
    metrics_file: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let engine = SizingEngine::new(settings.catalog()?)
        .with_thresholds(settings.thresholds.sizing)
        .with_disk_thresholds(settings.thresholds.disk)
        .with_logger(StructuredLogger::new(source.name()));

    let snapshot = source
        .fetch()
        .await
        .with_context(|| format!("Failed to fetch data from {} metrics source", source.name()))?;
    let report = engine
        .run(&snapshot)
        .context("Report aborted, no partial report was generated")?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report)?;
            println!("{}", json);
        }
        OutputFormat::Table => {
            if report.hosts.is_empty() {
                print_warning("No hosts returned by the metrics source");
            }
            println!(
                "{}",
                render_tables(&report, engine.disk_thresholds(), &settings.currency)
            );
        }
    }

    if let Some(path) = metrics_file {
        write_metrics(path)?;
        if matches!(format, OutputFormat::Table) {
            print_success(&format!("Metrics written to {}", path.display()));
        }
    }

    Ok(())
}

/// Write the Prometheus text exposition of this run's counters
fn write_metrics(path: &Path) -> Result<()> {
    let text = SizingMetrics::new()
        .encode_text()
        .context("Failed to encode metrics")?;
    std::fs::write(path, text)
        .with_context(|| format!("Failed to write metrics file {}", path.display()))
}

fn savings(found: &SizeMatch) -> f64 {
    found.hourly_cost().unwrap_or(0.0)
}

fn cpu_row(result: &ClassificationResult, currency: &str) -> CpuRow {
    let hourly = savings(&result.cpu_match);
    CpuRow {
        hostname: result.hostname.clone(),
        status: color_status(result.status),
        cpu_percent: format_percent(result.cpu_percent),
        recommended: result.cpu_match.label().to_string(),
        hourly: format_currency(hourly, currency),
        monthly: format_currency(monthly_cost(hourly), currency),
    }
}

fn memory_row(result: &ClassificationResult, currency: &str) -> MemoryRow {
    let hourly = savings(&result.memory_match);
    MemoryRow {
        hostname: result.hostname.clone(),
        memory_percent: format_percent(result.memory_used_percent),
        recommended: result.memory_match.label().to_string(),
        hourly: format_currency(hourly, currency),
        monthly: format_currency(monthly_cost(hourly), currency),
    }
}

fn section(title: &str, table: String) -> String {
    format!("{}\n{}\n{}\n", title.bold(), "=".repeat(50), table)
}

fn rounded<T: Tabled>(rows: Vec<T>) -> String {
    tabled::Table::new(rows)
        .with(tabled::settings::Style::rounded())
        .to_string()
}

/// Render the three report sections as terminal tables
fn render_tables(report: &SizingReport, thresholds: &DiskThresholds, currency: &str) -> String {
    let mut out = format!(
        "Report generated on: {}\n\n",
        report
            .generated_at
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d")
    );

    if !report.hosts.is_empty() {
        let cpu_rows = report.hosts.iter().map(|h| cpu_row(h, currency)).collect();
        out.push_str(&section("CPU Usage Analysis", rounded::<CpuRow>(cpu_rows)));
        out.push('\n');

        let memory_rows = report.hosts.iter().map(|h| memory_row(h, currency)).collect();
        out.push_str(&section("Memory Usage Analysis", rounded::<MemoryRow>(memory_rows)));
        out.push('\n');
    }

    if !report.forecasts.is_empty() {
        let disk_rows = report
            .forecasts
            .iter()
            .map(|f| DiskRow {
                hostname: f.hostname.clone(),
                current: color_disk(f.current, thresholds),
                week: color_disk(f.week_estimate, thresholds),
                month: color_disk(f.month_estimate, thresholds),
                quarter: color_disk(f.quarter_estimate, thresholds),
                recommended: f.disk_match.label().to_string(),
            })
            .collect();
        out.push_str(&section(
            "Current Disk Utilization and Forecast",
            rounded::<DiskRow>(disk_rows),
        ));
    }

    out.push_str(&format!(
        "\nTotal: {} hosts, {} disk forecasts",
        report.hosts.len(),
        report.forecasts.len()
    ));
    out
}
