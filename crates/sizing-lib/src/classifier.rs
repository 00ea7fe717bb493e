//! Utilization classification
//!
//! Labels a host Undersized, Oversized or Right-Sized from its averaged CPU,
//! memory and one-minute load. Undersized is checked first so a host is never
//! flagged both ways.

use crate::models::{HostMetricSample, SizingStatus};
use serde::{Deserialize, Serialize};

/// CPU percent above which a host is undersized
pub const CPU_OVER_THRESHOLD: f64 = 80.0;

/// CPU percent below which a host may be oversized
pub const CPU_UNDER_THRESHOLD: f64 = 20.0;

/// Memory percent above which a host is undersized
pub const MEMORY_OVER_THRESHOLD: f64 = 80.0;

/// Memory percent below which a host may be oversized
pub const MEMORY_UNDER_THRESHOLD: f64 = 20.0;

/// Load per core above which a host is undersized
pub const LOAD_OVER_FACTOR: f64 = 1.5;

/// Classification thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizingThresholds {
    pub cpu_over: f64,
    pub cpu_under: f64,
    pub memory_over: f64,
    pub memory_under: f64,
    pub load_over_factor: f64,
}

impl Default for SizingThresholds {
    fn default() -> Self {
        Self {
            cpu_over: CPU_OVER_THRESHOLD,
            cpu_under: CPU_UNDER_THRESHOLD,
            memory_over: MEMORY_OVER_THRESHOLD,
            memory_under: MEMORY_UNDER_THRESHOLD,
            load_over_factor: LOAD_OVER_FACTOR,
        }
    }
}

impl SizingThresholds {
    /// Classify a host sample
    ///
    /// A host with zero reported cores and any positive load is undersized;
    /// missing core data must not hide overload.
    pub fn classify(&self, sample: &HostMetricSample) -> SizingStatus {
        let load_limit = self.load_over_factor * f64::from(sample.core_count);

        if sample.cpu_percent > self.cpu_over
            || sample.memory_used_percent > self.memory_over
            || sample.load_average_one_minute > load_limit
        {
            SizingStatus::Undersized
        } else if sample.cpu_percent < self.cpu_under
            && sample.memory_used_percent < self.memory_under
        {
            SizingStatus::Oversized
        } else {
            SizingStatus::RightSized
        }
    }
}

/// Classify with the default thresholds
pub fn classify(sample: &HostMetricSample) -> SizingStatus {
    SizingThresholds::default().classify(sample)
}
