//! Host right-sizing and disk forecast engine
//!
//! This crate provides the core functionality for:
//! - Classifying hosts as right-sized, undersized or oversized
//! - Finding the cheapest catalog size for each resize direction
//! - Evaluating disk utilization forecasts against alert thresholds
//! - Fetching host metrics from New Relic NerdGraph
//! - Structured logging and Prometheus run metrics

pub mod catalog;
pub mod classifier;
pub mod engine;
pub mod error;
pub mod forecast;
pub mod matcher;
pub mod models;
pub mod observability;
pub mod source;

pub use catalog::SizeCatalog;
pub use classifier::{classify, SizingThresholds};
pub use engine::{analyze_host, SizingEngine};
pub use error::{CatalogError, EngineError, SourceError};
pub use forecast::{clamp_percent, evaluate_forecast, DiskSeverity, DiskThresholds, ForecastMarkers};
pub use matcher::{best_match, cheapest_where, MatchDimension};
pub use models::*;
pub use observability::{SizingMetrics, StructuredLogger};
pub use source::{FileSource, MetricsSnapshot, MetricsSource, NerdGraphClient};
