//! Validated size catalog

use crate::error::CatalogError;
use crate::models::SizeCatalogEntry;
use serde::Serialize;
use std::ops::Deref;

/// Ordered, read-only list of instance sizes
///
/// Order is significant: cost ties resolve to the earlier entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SizeCatalog {
    entries: Vec<SizeCatalogEntry>,
}

impl SizeCatalog {
    /// Validate entries and build a catalog
    ///
    /// Rejects an empty list, blank names and capacities or costs that are
    /// negative or not finite.
    pub fn new(entries: Vec<SizeCatalogEntry>) -> Result<Self, CatalogError> {
        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }

        for (index, entry) in entries.iter().enumerate() {
            if entry.name.trim().is_empty() {
                return Err(CatalogError::MissingName { index });
            }
            for (field, value) in [
                ("cpu", entry.cpu),
                ("memory", entry.memory),
                ("disk", entry.disk),
                ("hourly_cost", entry.hourly_cost),
            ] {
                if !value.is_finite() || value < 0.0 {
                    return Err(CatalogError::InvalidValue {
                        name: entry.name.clone(),
                        field,
                        value,
                    });
                }
            }
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[SizeCatalogEntry] {
        &self.entries
    }
}

impl Deref for SizeCatalog {
    type Target = [SizeCatalogEntry];

    fn deref(&self) -> &Self::Target {
        &self.entries
    }
}

impl TryFrom<Vec<SizeCatalogEntry>> for SizeCatalog {
    type Error = CatalogError;

    fn try_from(entries: Vec<SizeCatalogEntry>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}
