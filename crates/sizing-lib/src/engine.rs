//! Sizing pipeline
//!
//! Host samples flow through classification and the two catalog searches;
//! disk samples flow through the forecast evaluator. Both outputs keep the
//! order the metrics source returned.

use crate::catalog::SizeCatalog;
use crate::classifier::SizingThresholds;
use crate::error::EngineError;
use crate::forecast::{evaluate_forecast, DiskSeverity, DiskThresholds};
use crate::matcher::{best_match, MatchDimension};
use crate::models::{
    ClassificationResult, DiskForecastSample, ForecastRecord, HostMetricSample, SizeCatalogEntry,
    SizingReport, SizingStatus,
};
use crate::observability::{dimension_label, SizingMetrics, StructuredLogger};
use crate::source::MetricsSnapshot;

/// Classify one host and search the catalog for both recommendations
pub fn analyze_host(
    sample: &HostMetricSample,
    catalog: &[SizeCatalogEntry],
    thresholds: &SizingThresholds,
) -> ClassificationResult {
    let status = thresholds.classify(sample);
    let memory_gib = sample.memory_used_gib();

    ClassificationResult {
        hostname: sample.hostname.clone(),
        status,
        instance_type: sample.instance_type.clone(),
        cpu_percent: sample.cpu_percent,
        core_count: sample.core_count,
        memory_gib,
        memory_used_percent: sample.memory_used_percent,
        load_average_one_minute: sample.load_average_one_minute,
        cpu_match: best_match(status, sample.core_count, memory_gib, catalog, MatchDimension::Joint),
        memory_match: best_match(
            status,
            sample.core_count,
            memory_gib,
            catalog,
            MatchDimension::MemoryOnly,
        ),
    }
}

/// Runs the sizing pipeline against a fixed catalog
pub struct SizingEngine {
    catalog: SizeCatalog,
    thresholds: SizingThresholds,
    disk_thresholds: DiskThresholds,
    logger: StructuredLogger,
    metrics: SizingMetrics,
}

impl SizingEngine {
    pub fn new(catalog: SizeCatalog) -> Self {
        Self {
            catalog,
            thresholds: SizingThresholds::default(),
            disk_thresholds: DiskThresholds::default(),
            logger: StructuredLogger::new("engine"),
            metrics: SizingMetrics::new(),
        }
    }

    pub fn with_thresholds(mut self, thresholds: SizingThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_disk_thresholds(mut self, disk_thresholds: DiskThresholds) -> Self {
        self.disk_thresholds = disk_thresholds;
        self
    }

    pub fn with_logger(mut self, logger: StructuredLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn catalog(&self) -> &SizeCatalog {
        &self.catalog
    }

    pub fn disk_thresholds(&self) -> &DiskThresholds {
        &self.disk_thresholds
    }

    pub fn analyze_hosts(&self, samples: &[HostMetricSample]) -> Vec<ClassificationResult> {
        samples
            .iter()
            .map(|sample| {
                let result = analyze_host(sample, &self.catalog, &self.thresholds);
                self.record_host(&result);
                result
            })
            .collect()
    }

    pub fn forecast_disks(&self, samples: &[DiskForecastSample]) -> Vec<ForecastRecord> {
        samples
            .iter()
            .map(|sample| {
                let record = evaluate_forecast(sample, &self.catalog);
                self.record_forecast(&record);
                record
            })
            .collect()
    }

    /// Build the full report
    ///
    /// Fails without producing a partial report when either sample set is
    /// absent from the snapshot.
    pub fn run(&self, snapshot: &MetricsSnapshot) -> Result<SizingReport, EngineError> {
        let system = snapshot
            .system
            .as_deref()
            .ok_or(EngineError::MissingSamples("system"))?;
        let storage = snapshot
            .storage
            .as_deref()
            .ok_or(EngineError::MissingSamples("storage"))?;

        self.logger
            .log_run_started(system.len(), storage.len(), self.catalog.len());

        let hosts = self.analyze_hosts(system);
        let forecasts = self.forecast_disks(storage);

        let count = |status: SizingStatus| hosts.iter().filter(|h| h.status == status).count();
        self.logger.log_run_completed(
            count(SizingStatus::Undersized),
            count(SizingStatus::Oversized),
            count(SizingStatus::RightSized),
        );

        Ok(SizingReport {
            generated_at: chrono::Utc::now(),
            hosts,
            forecasts,
        })
    }

    fn record_host(&self, result: &ClassificationResult) {
        self.metrics.inc_hosts_analyzed(result.status);
        if result.status != SizingStatus::RightSized {
            for (dimension, found) in [
                (MatchDimension::Joint, &result.cpu_match),
                (MatchDimension::MemoryOnly, &result.memory_match),
            ] {
                if !found.is_match() {
                    self.metrics.inc_unmatched(dimension_label(dimension));
                }
            }
        }
        self.logger.log_host_classified(result);
    }

    fn record_forecast(&self, record: &ForecastRecord) {
        self.metrics.inc_forecasts_evaluated();
        self.logger.log_forecast_evaluated(record);

        let worst = record.markers(&self.disk_thresholds).worst();
        if worst != DiskSeverity::Normal {
            self.metrics.inc_disk_alerts(worst);
            self.logger.log_disk_threshold(record, worst);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SizeMatch, BYTES_PER_GIB};

    fn catalog() -> SizeCatalog {
        SizeCatalog::new(vec![
            SizeCatalogEntry {
                name: "S".to_string(),
                cpu: 4.0,
                memory: 8.0,
                disk: 50.0,
                hourly_cost: 0.5,
            },
            SizeCatalogEntry {
                name: "M".to_string(),
                cpu: 8.0,
                memory: 16.0,
                disk: 100.0,
                hourly_cost: 1.0,
            },
        ])
        .unwrap()
    }

    fn host(name: &str, cpu: f64, mem: f64, load: f64, cores: u32, mem_gib: f64) -> HostMetricSample {
        HostMetricSample {
            cpu_percent: cpu,
            memory_used_percent: mem,
            load_average_one_minute: load,
            core_count: cores,
            memory_used_bytes: mem_gib * BYTES_PER_GIB,
            ..HostMetricSample::new(name)
        }
    }

    #[test]
    fn test_analyze_host_example() {
        let sample = host("app-1", 85.0, 40.0, 2.0, 4, 8.0);
        let result = analyze_host(&sample, &catalog(), &SizingThresholds::default());

        assert_eq!(result.status, SizingStatus::Undersized);
        assert_eq!(result.cpu_match.label(), "S");
        assert_eq!(result.cpu_match.hourly_cost(), Some(0.5));
        assert_eq!(result.memory_match.label(), "S");
        assert_eq!(result.memory_gib, 8.0);
    }

    #[test]
    fn test_oversized_without_smaller_size() {
        let sample = host("tiny", 5.0, 5.0, 0.0, 2, 1.0);
        let result = analyze_host(&sample, &catalog(), &SizingThresholds::default());

        assert_eq!(result.status, SizingStatus::Oversized);
        assert_eq!(result.cpu_match, SizeMatch::NoMatch);
        assert_eq!(result.memory_match, SizeMatch::NoMatch);
    }

    #[test]
    fn test_analyze_hosts_preserves_input_order() {
        let engine = SizingEngine::new(catalog());
        let samples = vec![
            host("zeta", 50.0, 50.0, 0.5, 4, 4.0),
            host("alpha", 90.0, 50.0, 0.5, 4, 4.0),
            host("mid", 10.0, 10.0, 0.5, 16, 32.0),
        ];
        let names: Vec<_> = engine
            .analyze_hosts(&samples)
            .into_iter()
            .map(|r| r.hostname)
            .collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let engine = SizingEngine::new(catalog());
        let samples = vec![
            host("a", 85.0, 40.0, 2.0, 4, 8.0),
            host("b", 10.0, 10.0, 0.1, 16, 20.0),
        ];
        let first = serde_json::to_string(&engine.analyze_hosts(&samples)).unwrap();
        let second = serde_json::to_string(&engine.analyze_hosts(&samples)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_run_requires_both_sample_sets() {
        let engine = SizingEngine::new(catalog());

        let missing_storage = MetricsSnapshot {
            system: Some(vec![host("a", 50.0, 50.0, 0.5, 4, 4.0)]),
            storage: None,
        };
        assert!(matches!(
            engine.run(&missing_storage),
            Err(EngineError::MissingSamples("storage"))
        ));

        let missing_system = MetricsSnapshot {
            system: None,
            storage: Some(vec![]),
        };
        assert!(matches!(
            engine.run(&missing_system),
            Err(EngineError::MissingSamples("system"))
        ));
    }

    #[test]
    fn test_run_with_empty_sets_is_empty_report() {
        let engine = SizingEngine::new(catalog());
        let snapshot = MetricsSnapshot {
            system: Some(vec![]),
            storage: Some(vec![]),
        };
        let report = engine.run(&snapshot).unwrap();
        assert!(report.hosts.is_empty());
        assert!(report.forecasts.is_empty());
    }
}
