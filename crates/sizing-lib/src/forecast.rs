//! Disk utilization forecast evaluation
//!
//! Projections come from linear extrapolation and can leave the physical
//! range, so every recorded percentage is clamped to `[0, 100]`. Threshold
//! markers are derived on demand and never stored on the record.

use crate::matcher::cheapest_where;
use crate::models::{DiskForecastSample, ForecastRecord, SizeCatalogEntry};
use serde::{Deserialize, Serialize};

/// Disk percent above which a value is marked as a warning
pub const DISK_WARNING_THRESHOLD: f64 = 80.0;

/// Disk percent above which a value is marked as critical
pub const DISK_CRITICAL_THRESHOLD: f64 = 90.0;

/// Disk utilization marker thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiskThresholds {
    pub warning: f64,
    pub critical: f64,
}

impl Default for DiskThresholds {
    fn default() -> Self {
        Self {
            warning: DISK_WARNING_THRESHOLD,
            critical: DISK_CRITICAL_THRESHOLD,
        }
    }
}

impl DiskThresholds {
    /// Marker for a value as reported, i.e. rounded to two decimals
    ///
    /// A value reported as "90.00%" is never critical.
    pub fn severity(&self, percent: f64) -> DiskSeverity {
        let percent = round_to_reported(percent);
        if percent > self.critical {
            DiskSeverity::Critical
        } else if percent > self.warning {
            DiskSeverity::Warning
        } else {
            DiskSeverity::Normal
        }
    }
}

fn round_to_reported(percent: f64) -> f64 {
    format!("{:.2}", percent).parse().unwrap_or(percent)
}

/// Marker for one disk utilization value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiskSeverity {
    Normal,
    Warning,
    Critical,
}

impl DiskSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiskSeverity::Normal => "normal",
            DiskSeverity::Warning => "warning",
            DiskSeverity::Critical => "critical",
        }
    }
}

/// Markers for the four columns of a forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastMarkers {
    pub current: DiskSeverity,
    pub week: DiskSeverity,
    pub month: DiskSeverity,
    pub quarter: DiskSeverity,
}

impl ForecastMarkers {
    /// Most severe marker across the four values
    pub fn worst(&self) -> DiskSeverity {
        self.current.max(self.week).max(self.month).max(self.quarter)
    }
}

/// Restrict a percentage to `[0, 100]`; non-numbers become 0
pub fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

/// Build the forecast record for one host
///
/// The disk recommendation is the cheapest entry whose capacity covers the
/// raw current reading.
pub fn evaluate_forecast(sample: &DiskForecastSample, catalog: &[SizeCatalogEntry]) -> ForecastRecord {
    let current = sample.current_size;
    let disk_match = cheapest_where(catalog, |e| e.disk >= current).cloned().into();

    ForecastRecord {
        hostname: sample.hostname.clone(),
        instance_type: sample.instance_type.clone(),
        current: clamp_percent(current),
        week_estimate: clamp_percent(sample.week_estimate_size),
        month_estimate: clamp_percent(sample.month_estimate_size),
        quarter_estimate: clamp_percent(sample.quarter_estimate_size),
        disk_match,
    }
}

impl ForecastRecord {
    pub fn markers(&self, thresholds: &DiskThresholds) -> ForecastMarkers {
        ForecastMarkers {
            current: thresholds.severity(self.current),
            week: thresholds.severity(self.week_estimate),
            month: thresholds.severity(self.month_estimate),
            quarter: thresholds.severity(self.quarter_estimate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SizeMatch;

    fn disk_entry(name: &str, disk: f64, cost: f64) -> SizeCatalogEntry {
        SizeCatalogEntry {
            name: name.to_string(),
            cpu: 2.0,
            memory: 4.0,
            disk,
            hourly_cost: cost,
        }
    }

    fn forecast(current: f64, week: f64, month: f64, quarter: f64) -> DiskForecastSample {
        DiskForecastSample {
            current_size: current,
            week_estimate_size: week,
            month_estimate_size: month,
            quarter_estimate_size: quarter,
            ..DiskForecastSample::new("db-1")
        }
    }

    #[test]
    fn test_projections_are_clamped() {
        let record = evaluate_forecast(&forecast(50.0, -12.0, 104.5, 250.0), &[]);
        assert_eq!(record.week_estimate, 0.0);
        assert_eq!(record.month_estimate, 100.0);
        assert_eq!(record.quarter_estimate, 100.0);
        assert_eq!(record.current, 50.0);
    }

    #[test]
    fn test_clamp_percent_bounds() {
        for v in [-1e9, -0.1, 0.0, 42.0, 100.0, 100.1, 1e12, f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            let c = clamp_percent(v);
            assert!((0.0..=100.0).contains(&c), "{v} clamped to {c}");
        }
    }

    #[test]
    fn test_disk_match_cheapest_with_capacity() {
        let catalog = vec![
            disk_entry("tiny", 40.0, 0.05),
            disk_entry("big", 200.0, 0.50),
            disk_entry("mid", 100.0, 0.20),
        ];
        let record = evaluate_forecast(&forecast(75.0, 80.0, 85.0, 90.0), &catalog);
        assert_eq!(record.disk_match.label(), "mid");
    }

    #[test]
    fn test_disk_match_missing() {
        let catalog = vec![disk_entry("tiny", 40.0, 0.05)];
        let record = evaluate_forecast(&forecast(75.0, 0.0, 0.0, 0.0), &catalog);
        assert_eq!(record.disk_match, SizeMatch::NoMatch);
    }

    #[test]
    fn test_zero_disk_entry_only_for_zero_usage() {
        let catalog = vec![disk_entry("diskless", 0.0, 0.01)];
        assert!(!evaluate_forecast(&forecast(0.5, 0.0, 0.0, 0.0), &catalog).disk_match.is_match());
        assert!(evaluate_forecast(&forecast(0.0, 0.0, 0.0, 0.0), &catalog).disk_match.is_match());
    }

    #[test]
    fn test_severity_markers() {
        let thresholds = DiskThresholds::default();
        assert_eq!(thresholds.severity(95.0), DiskSeverity::Critical);
        assert_eq!(thresholds.severity(85.0), DiskSeverity::Warning);
        assert_eq!(thresholds.severity(50.0), DiskSeverity::Normal);
        assert_eq!(thresholds.severity(90.0), DiskSeverity::Warning);
        assert_eq!(thresholds.severity(80.0), DiskSeverity::Normal);
    }

    #[test]
    fn test_severity_judges_reported_value() {
        let thresholds = DiskThresholds::default();
        assert_eq!(thresholds.severity(90.004), DiskSeverity::Warning);
        assert_eq!(thresholds.severity(90.006), DiskSeverity::Critical);
        assert_eq!(thresholds.severity(80.001), DiskSeverity::Normal);

        let record = evaluate_forecast(&forecast(90.004, 90.004, 90.004, 90.004), &[]);
        assert_eq!(record.markers(&thresholds).worst(), DiskSeverity::Warning);
    }

    #[test]
    fn test_record_markers_per_column() {
        let record = evaluate_forecast(&forecast(50.0, 85.0, 92.0, 130.0), &[]);
        let markers = record.markers(&DiskThresholds::default());
        assert_eq!(markers.current, DiskSeverity::Normal);
        assert_eq!(markers.week, DiskSeverity::Warning);
        assert_eq!(markers.month, DiskSeverity::Critical);
        assert_eq!(markers.quarter, DiskSeverity::Critical);
        assert_eq!(markers.worst(), DiskSeverity::Critical);
    }
}
