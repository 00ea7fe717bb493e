//! Observability infrastructure for sizing runs
//!
//! Provides:
//! - Prometheus run counters (hosts per status, unmatched searches, disk alerts, fetch latency)
//! - Structured logging with tracing

use crate::forecast::DiskSeverity;
use crate::matcher::MatchDimension;
use crate::models::{ClassificationResult, ForecastRecord, SizingStatus};
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, Encoder, Histogram,
    IntCounter, IntCounterVec, TextEncoder,
};
use std::sync::OnceLock;
use tracing::{debug, info, warn};

/// Histogram buckets for metrics source round trips (in seconds)
const FETCH_LATENCY_BUCKETS: &[f64] = &[0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<SizingMetricsInner> = OnceLock::new();

struct SizingMetricsInner {
    hosts_analyzed: IntCounterVec,
    unmatched: IntCounterVec,
    forecasts_evaluated: IntCounter,
    disk_alerts: IntCounterVec,
    fetch_latency_seconds: Histogram,
    fetch_errors: IntCounter,
}

impl SizingMetricsInner {
    fn new() -> Self {
        Self {
            hosts_analyzed: register_int_counter_vec!(
                "rightsize_hosts_analyzed_total",
                "Hosts classified, by sizing status",
                &["status"]
            )
            .expect("Failed to register hosts_analyzed"),

            unmatched: register_int_counter_vec!(
                "rightsize_unmatched_total",
                "Catalog searches that found no qualifying size",
                &["dimension"]
            )
            .expect("Failed to register unmatched"),

            forecasts_evaluated: register_int_counter!(
                "rightsize_forecasts_evaluated_total",
                "Disk forecasts evaluated"
            )
            .expect("Failed to register forecasts_evaluated"),

            disk_alerts: register_int_counter_vec!(
                "rightsize_disk_alerts_total",
                "Hosts whose worst disk value crossed a threshold",
                &["severity"]
            )
            .expect("Failed to register disk_alerts"),

            fetch_latency_seconds: register_histogram!(
                "rightsize_fetch_latency_seconds",
                "Time spent querying the metrics source",
                FETCH_LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register fetch_latency_seconds"),

            fetch_errors: register_int_counter!(
                "rightsize_fetch_errors_total",
                "Failed metrics source queries"
            )
            .expect("Failed to register fetch_errors"),
        }
    }
}

/// Handle to the process-wide sizing metrics
///
/// Clones share the same underlying Prometheus collectors.
#[derive(Clone)]
pub struct SizingMetrics {
    _private: (),
}

impl Default for SizingMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl SizingMetrics {
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(SizingMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &SizingMetricsInner {
        GLOBAL_METRICS.get_or_init(SizingMetricsInner::new)
    }

    pub fn inc_hosts_analyzed(&self, status: SizingStatus) {
        self.inner()
            .hosts_analyzed
            .with_label_values(&[status.as_str()])
            .inc();
    }

    pub fn inc_unmatched(&self, dimension: &str) {
        self.inner().unmatched.with_label_values(&[dimension]).inc();
    }

    pub fn inc_forecasts_evaluated(&self) {
        self.inner().forecasts_evaluated.inc();
    }

    pub fn inc_disk_alerts(&self, severity: DiskSeverity) {
        self.inner()
            .disk_alerts
            .with_label_values(&[severity.as_str()])
            .inc();
    }

    pub fn observe_fetch_latency(&self, duration_secs: f64) {
        self.inner().fetch_latency_seconds.observe(duration_secs);
    }

    pub fn inc_fetch_errors(&self) {
        self.inner().fetch_errors.inc();
    }

    /// Current value of the per-status host counter
    pub fn hosts_analyzed(&self, status: SizingStatus) -> u64 {
        self.inner()
            .hosts_analyzed
            .with_label_values(&[status.as_str()])
            .get()
    }

    /// Render every registered metric in the Prometheus text format
    pub fn encode_text(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&prometheus::gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

/// Label used for a match dimension in metrics and logs
pub fn dimension_label(dimension: MatchDimension) -> &'static str {
    match dimension {
        MatchDimension::Joint => "cpu",
        MatchDimension::MemoryOnly => "memory",
    }
}

/// Structured logger for sizing run events
#[derive(Clone)]
pub struct StructuredLogger {
    source: String,
}

impl StructuredLogger {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn log_run_started(&self, hosts: usize, forecasts: usize, catalog_size: usize) {
        info!(
            event = "report_started",
            source = %self.source,
            hosts = hosts,
            forecasts = forecasts,
            catalog_size = catalog_size,
            "Sizing run started"
        );
    }

    pub fn log_host_classified(&self, result: &ClassificationResult) {
        debug!(
            event = "host_classified",
            source = %self.source,
            hostname = %result.hostname,
            status = %result.status,
            cpu_percent = result.cpu_percent,
            memory_used_percent = result.memory_used_percent,
            load_average_one_minute = result.load_average_one_minute,
            core_count = result.core_count,
            cpu_match = %result.cpu_match.label(),
            memory_match = %result.memory_match.label(),
            "Host classified"
        );
    }

    pub fn log_forecast_evaluated(&self, record: &ForecastRecord) {
        debug!(
            event = "forecast_evaluated",
            source = %self.source,
            hostname = %record.hostname,
            current = record.current,
            week_estimate = record.week_estimate,
            month_estimate = record.month_estimate,
            quarter_estimate = record.quarter_estimate,
            disk_match = %record.disk_match.label(),
            "Disk forecast evaluated"
        );
    }

    pub fn log_disk_threshold(&self, record: &ForecastRecord, severity: DiskSeverity) {
        match severity {
            DiskSeverity::Critical => {
                warn!(
                    event = "disk_threshold_crossed",
                    source = %self.source,
                    hostname = %record.hostname,
                    severity = %severity.as_str(),
                    current = record.current,
                    quarter_estimate = record.quarter_estimate,
                    "Disk utilization critical"
                );
            }
            DiskSeverity::Warning => {
                info!(
                    event = "disk_threshold_crossed",
                    source = %self.source,
                    hostname = %record.hostname,
                    severity = %severity.as_str(),
                    current = record.current,
                    quarter_estimate = record.quarter_estimate,
                    "Disk utilization warning"
                );
            }
            DiskSeverity::Normal => {}
        }
    }

    pub fn log_run_completed(&self, undersized: usize, oversized: usize, right_sized: usize) {
        info!(
            event = "report_completed",
            source = %self.source,
            undersized = undersized,
            oversized = oversized,
            right_sized = right_sized,
            "Sizing run completed"
        );
    }

    pub fn log_fetch_failed(&self, query: &str, error: &str) {
        warn!(
            event = "fetch_failed",
            source = %self.source,
            query = %query,
            error = %error,
            "Metrics source query failed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizing_metrics_record_and_encode() {
        let metrics = SizingMetrics::new();
        let before = metrics.hosts_analyzed(SizingStatus::Oversized);

        metrics.inc_hosts_analyzed(SizingStatus::Oversized);
        metrics.inc_unmatched("cpu");
        metrics.inc_forecasts_evaluated();
        metrics.inc_disk_alerts(DiskSeverity::Warning);
        metrics.observe_fetch_latency(0.2);

        assert!(metrics.hosts_analyzed(SizingStatus::Oversized) > before);
        let text = metrics.encode_text().unwrap();
        assert!(text.contains("rightsize_hosts_analyzed_total"));
        assert!(text.contains("rightsize_fetch_latency_seconds"));
    }

    #[test]
    fn test_dimension_labels() {
        assert_eq!(dimension_label(MatchDimension::Joint), "cpu");
        assert_eq!(dimension_label(MatchDimension::MemoryOnly), "memory");
    }

    #[test]
    fn test_structured_logger_creation() {
        let logger = StructuredLogger::new("newrelic");
        assert_eq!(logger.source, "newrelic");
    }
}
