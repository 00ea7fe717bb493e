//! Metrics sources
//!
//! A source supplies the two sample sets the engine consumes: per-host
//! CPU/memory/load averages and per-host disk forecasts. Either set may be
//! absent when its query failed; the engine decides whether that is fatal.

mod file;
mod newrelic;
mod nrql;

pub use file::FileSource;
pub use newrelic::{NerdGraphClient, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};
pub use nrql::{
    graphql_query, nrql_results, parse_storage_samples, parse_system_samples,
    STORAGE_SAMPLE_NRQL, SYSTEM_SAMPLE_NRQL,
};

use crate::error::SourceError;
use crate::models::{DiskForecastSample, HostMetricSample};
use async_trait::async_trait;

/// Sample sets fetched for one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsSnapshot {
    pub system: Option<Vec<HostMetricSample>>,
    pub storage: Option<Vec<DiskForecastSample>>,
}

/// Trait for metrics source implementations
#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// Fetch both sample sets
    async fn fetch(&self) -> Result<MetricsSnapshot, SourceError>;

    /// Short name used in logs
    fn name(&self) -> &str;
}
