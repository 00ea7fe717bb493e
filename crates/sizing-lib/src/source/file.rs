//! Offline source reading saved NerdGraph responses from disk

use super::nrql::{parse_storage_samples, parse_system_samples};
use super::{MetricsSnapshot, MetricsSource};
use crate::error::SourceError;
use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Reads the system and storage responses from two JSON files
pub struct FileSource {
    system_path: PathBuf,
    storage_path: PathBuf,
}

impl FileSource {
    pub fn new(system_path: impl Into<PathBuf>, storage_path: impl Into<PathBuf>) -> Self {
        Self {
            system_path: system_path.into(),
            storage_path: storage_path.into(),
        }
    }

    async fn read_document(path: &Path) -> Result<Value, SourceError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| SourceError::Io {
                path: path.display().to_string(),
                source,
            })?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[async_trait]
impl MetricsSource for FileSource {
    async fn fetch(&self) -> Result<MetricsSnapshot, SourceError> {
        let system = Self::read_document(&self.system_path).await?;
        let storage = Self::read_document(&self.storage_path).await?;

        Ok(MetricsSnapshot {
            system: Some(parse_system_samples(&system)?),
            storage: Some(parse_storage_samples(&storage)?),
        })
    }

    fn name(&self) -> &str {
        "file"
    }
}
