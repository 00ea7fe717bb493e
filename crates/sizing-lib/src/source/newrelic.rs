//! New Relic NerdGraph client

use super::nrql::{
    graphql_query, parse_storage_samples, parse_system_samples, STORAGE_SAMPLE_NRQL,
    SYSTEM_SAMPLE_NRQL,
};
use super::{MetricsSnapshot, MetricsSource};
use crate::error::SourceError;
use crate::observability::{SizingMetrics, StructuredLogger};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

/// Public NerdGraph endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.newrelic.com/graphql";

/// Per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs the system and storage NRQL queries for one account
pub struct NerdGraphClient {
    client: Client,
    endpoint: Url,
    api_key: String,
    account_id: u64,
    logger: StructuredLogger,
    metrics: SizingMetrics,
}

impl NerdGraphClient {
    pub fn new(
        endpoint: &str,
        api_key: impl Into<String>,
        account_id: u64,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        let client = Client::builder().timeout(timeout).build()?;
        let endpoint = Url::parse(endpoint)?;

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.into(),
            account_id,
            logger: StructuredLogger::new("newrelic"),
            metrics: SizingMetrics::new(),
        })
    }

    /// Run one NRQL statement and return the raw response document
    pub async fn query(&self, nrql: &str) -> Result<Value, SourceError> {
        let started = Instant::now();
        let body = json!({ "query": graphql_query(self.account_id, nrql) });

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("API-Key", &self.api_key)
            .json(&body)
            .send()
            .await;
        self.metrics
            .observe_fetch_latency(started.elapsed().as_secs_f64());

        let response = response?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        let document: Value = serde_json::from_str(&text)?;
        debug!(account_id = self.account_id, "NerdGraph query completed");
        Ok(document)
    }

    fn record_failure(&self, query: &str, error: &SourceError) {
        self.metrics.inc_fetch_errors();
        self.logger.log_fetch_failed(query, &error.to_string());
    }
}

#[async_trait]
impl MetricsSource for NerdGraphClient {
    /// A failed system query aborts the fetch; a failed storage query leaves
    /// the storage set empty.
    async fn fetch(&self) -> Result<MetricsSnapshot, SourceError> {
        let system = self
            .query(SYSTEM_SAMPLE_NRQL)
            .await
            .and_then(|doc| parse_system_samples(&doc))
            .inspect_err(|e| self.record_failure("system", e))?;

        let storage = match self
            .query(STORAGE_SAMPLE_NRQL)
            .await
            .and_then(|doc| parse_storage_samples(&doc))
        {
            Ok(samples) => Some(samples),
            Err(e) => {
                self.record_failure("storage", &e);
                None
            }
        };

        Ok(MetricsSnapshot {
            system: Some(system),
            storage,
        })
    }

    fn name(&self) -> &str {
        "newrelic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_endpoint_rejected() {
        let result = NerdGraphClient::new("not a url", "key", 1, DEFAULT_TIMEOUT);
        assert!(matches!(result, Err(SourceError::Endpoint(_))));
    }

    #[test]
    fn test_default_endpoint_parses() {
        assert!(NerdGraphClient::new(DEFAULT_ENDPOINT, "key", 1, DEFAULT_TIMEOUT).is_ok());
    }
}
