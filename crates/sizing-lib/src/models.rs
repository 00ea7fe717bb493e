//! Core data models for the sizing engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// Bytes in one GiB, used to compare memory usage against catalog capacities
pub const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Label shown wherever a search found no qualifying catalog entry
pub const NO_MATCH_LABEL: &str = "No better match found";

/// Instance type reported when the metrics source has none
pub const UNKNOWN_INSTANCE_TYPE: &str = "Unknown";

/// Per-host CPU, memory and load averages over the observation window
///
/// Fields absent from a record read as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostMetricSample {
    pub hostname: String,
    pub core_count: u32,
    pub memory_used_bytes: f64,
    pub cpu_percent: f64,
    pub memory_used_percent: f64,
    pub load_average_one_minute: f64,
    pub instance_type: String,
}

impl Default for HostMetricSample {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl HostMetricSample {
    /// Create a sample with every metric zeroed
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            core_count: 0,
            memory_used_bytes: 0.0,
            cpu_percent: 0.0,
            memory_used_percent: 0.0,
            load_average_one_minute: 0.0,
            instance_type: UNKNOWN_INSTANCE_TYPE.to_string(),
        }
    }

    /// Memory in use, in GiB
    pub fn memory_used_gib(&self) -> f64 {
        self.memory_used_bytes / BYTES_PER_GIB
    }
}

/// Per-host disk utilization reading plus linear projections, all in percent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiskForecastSample {
    pub hostname: String,
    pub current_size: f64,
    pub week_estimate_size: f64,
    pub month_estimate_size: f64,
    pub quarter_estimate_size: f64,
    pub instance_type: String,
}

impl Default for DiskForecastSample {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl DiskForecastSample {
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            current_size: 0.0,
            week_estimate_size: 0.0,
            month_estimate_size: 0.0,
            quarter_estimate_size: 0.0,
            instance_type: UNKNOWN_INSTANCE_TYPE.to_string(),
        }
    }
}

/// One purchasable instance size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeCatalogEntry {
    pub name: String,
    /// Cores
    pub cpu: f64,
    /// GiB
    pub memory: f64,
    /// Disk capacity, in the same units as the disk utilization metric
    pub disk: f64,
    pub hourly_cost: f64,
}

/// Utilization state of a host relative to its allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SizingStatus {
    #[serde(rename = "Right-Sized")]
    RightSized,
    Undersized,
    Oversized,
}

impl SizingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SizingStatus::RightSized => "Right-Sized",
            SizingStatus::Undersized => "Undersized",
            SizingStatus::Oversized => "Oversized",
        }
    }
}

impl fmt::Display for SizingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a catalog search
///
/// A zero-cost entry is a real match and stays distinct from `NoMatch`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SizeMatch {
    Matched(SizeCatalogEntry),
    NoMatch,
}

impl SizeMatch {
    pub fn entry(&self) -> Option<&SizeCatalogEntry> {
        match self {
            SizeMatch::Matched(entry) => Some(entry),
            SizeMatch::NoMatch => None,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, SizeMatch::Matched(_))
    }

    /// Catalog name, or the no-match label
    pub fn label(&self) -> &str {
        match self {
            SizeMatch::Matched(entry) => &entry.name,
            SizeMatch::NoMatch => NO_MATCH_LABEL,
        }
    }

    /// Hourly spend of the recommended size, `None` when nothing matched
    pub fn hourly_cost(&self) -> Option<f64> {
        self.entry().map(|e| e.hourly_cost)
    }
}

impl From<Option<SizeCatalogEntry>> for SizeMatch {
    fn from(entry: Option<SizeCatalogEntry>) -> Self {
        entry.map_or(SizeMatch::NoMatch, SizeMatch::Matched)
    }
}

/// Classification and size recommendations for one host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub hostname: String,
    pub status: SizingStatus,
    pub instance_type: String,
    pub cpu_percent: f64,
    pub core_count: u32,
    pub memory_gib: f64,
    pub memory_used_percent: f64,
    pub load_average_one_minute: f64,
    /// Cheapest size satisfying both CPU and memory constraints
    pub cpu_match: SizeMatch,
    /// Cheapest size satisfying the memory constraint alone
    pub memory_match: SizeMatch,
}

/// Disk utilization forecast and disk-driven size recommendation for one host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    pub hostname: String,
    pub instance_type: String,
    pub current: f64,
    pub week_estimate: f64,
    pub month_estimate: f64,
    pub quarter_estimate: f64,
    pub disk_match: SizeMatch,
}

/// Merged output of one run, in metrics-source order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizingReport {
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub hosts: Vec<ClassificationResult>,
    pub forecasts: Vec<ForecastRecord>,
}
