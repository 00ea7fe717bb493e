//! Cost-minimal size search over the catalog

use crate::models::{SizeCatalogEntry, SizeMatch, SizingStatus};
use serde::{Deserialize, Serialize};

/// Which constraints a candidate size has to satisfy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchDimension {
    /// CPU and memory together
    Joint,
    /// Memory alone, CPU ignored
    MemoryOnly,
}

/// Cheapest entry accepted by `predicate`, in a single pass
///
/// Ties on `hourly_cost` keep the entry seen first.
pub fn cheapest_where<'a, P>(
    catalog: &'a [SizeCatalogEntry],
    predicate: P,
) -> Option<&'a SizeCatalogEntry>
where
    P: Fn(&SizeCatalogEntry) -> bool,
{
    let mut best: Option<&SizeCatalogEntry> = None;
    for entry in catalog.iter().filter(|e| predicate(e)) {
        match best {
            Some(current) if entry.hourly_cost >= current.hourly_cost => {}
            _ => best = Some(entry),
        }
    }
    best
}

/// Cheapest size that moves a host in the direction its status calls for
///
/// Undersized hosts need at least their current capacity, oversized hosts at
/// most. Right-sized hosts get no recommendation.
pub fn best_match(
    status: SizingStatus,
    current_cpu: u32,
    current_memory_gib: f64,
    catalog: &[SizeCatalogEntry],
    dimension: MatchDimension,
) -> SizeMatch {
    let cpu = f64::from(current_cpu);
    let found = match (status, dimension) {
        (SizingStatus::RightSized, _) => None,
        (SizingStatus::Undersized, MatchDimension::Joint) => {
            cheapest_where(catalog, |e| e.cpu >= cpu && e.memory >= current_memory_gib)
        }
        (SizingStatus::Oversized, MatchDimension::Joint) => {
            cheapest_where(catalog, |e| e.cpu <= cpu && e.memory <= current_memory_gib)
        }
        (SizingStatus::Undersized, MatchDimension::MemoryOnly) => {
            cheapest_where(catalog, |e| e.memory >= current_memory_gib)
        }
        (SizingStatus::Oversized, MatchDimension::MemoryOnly) => {
            cheapest_where(catalog, |e| e.memory <= current_memory_gib)
        }
    };
    found.cloned().into()
}
