//! NRQL queries and NerdGraph response decoding
//!
//! Result rows are flat JSON objects keyed by the aggregate name, e.g.
//! `average.cpuPercent` or `latest.coreCount`, with the hostname in `facet`.
//! Absent or non-numeric values decode as 0.

use crate::error::SourceError;
use crate::models::{DiskForecastSample, HostMetricSample, UNKNOWN_INSTANCE_TYPE};
use serde_json::Value;

/// CPU, memory and load averages per host over the last 30 days
pub const SYSTEM_SAMPLE_NRQL: &str = "SELECT average(cpuPercent), average(memoryUsedPercent), \
average(diskUtilizationPercent), average(diskFreePercent), average(diskTotalBytes), \
average(memoryUsedBytes), average(diskUsedBytes), latest(coreCount), latest(instanceType), \
average(loadAverageOneMinute), average(loadAverageFifteenMinute) \
FROM SystemSample SINCE 30 days ago FACET hostname";

/// Latest disk usage per host plus linear projections
pub const STORAGE_SAMPLE_NRQL: &str = "FROM StorageSample SELECT latest(diskUsedPercent) as 'currentSize', \
predictLinear(diskUsedPercent, 1 week) as 'weekEstimateSize', \
predictLinear(diskUsedPercent, 1 month) as 'monthEstimateSize', \
predictLinear(diskUsedPercent, 3 months) as 'quarterEstimateSize' \
FACET hostname SINCE 30 days ago";

/// Wrap an NRQL statement in the NerdGraph account query
pub fn graphql_query(account_id: u64, nrql: &str) -> String {
    let nrql = serde_json::to_string(nrql).unwrap_or_default();
    format!(
        "{{ actor {{ account(id: {account_id}) {{ nrql(query: {nrql}) {{ results }} }} }} }}"
    )
}

/// Result rows of a NerdGraph NRQL response
///
/// A top-level `errors` member is reported as [`SourceError::Api`].
pub fn nrql_results(response: &Value) -> Result<&[Value], SourceError> {
    if let Some(errors) = response.get("errors").filter(|e| !e.is_null()) {
        return Err(SourceError::Api(errors.to_string()));
    }

    response
        .pointer("/data/actor/account/nrql/results")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or(SourceError::MissingField("data.actor.account.nrql.results"))
}

pub fn parse_system_samples(response: &Value) -> Result<Vec<HostMetricSample>, SourceError> {
    Ok(nrql_results(response)?
        .iter()
        .map(|row| HostMetricSample {
            hostname: facet(row),
            core_count: number(row, "latest.coreCount") as u32,
            memory_used_bytes: number(row, "average.memoryUsedBytes"),
            cpu_percent: number(row, "average.cpuPercent"),
            memory_used_percent: number(row, "average.memoryUsedPercent"),
            load_average_one_minute: number(row, "average.loadAverageOneMinute"),
            instance_type: text(row, "latest.instanceType"),
        })
        .collect())
}

pub fn parse_storage_samples(response: &Value) -> Result<Vec<DiskForecastSample>, SourceError> {
    Ok(nrql_results(response)?
        .iter()
        .map(|row| DiskForecastSample {
            hostname: facet(row),
            current_size: number(row, "currentSize"),
            week_estimate_size: number(row, "weekEstimateSize"),
            month_estimate_size: number(row, "monthEstimateSize"),
            quarter_estimate_size: number(row, "quarterEstimateSize"),
            instance_type: text(row, "latest.instanceType"),
        })
        .collect())
}

fn number(row: &Value, key: &str) -> f64 {
    match row.get(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn text(row: &Value, key: &str) -> String {
    match row.get(key) {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => UNKNOWN_INSTANCE_TYPE.to_string(),
    }
}

// Multi-facet queries return the facet as an array.
fn facet(row: &Value) -> String {
    match row.get("facet") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(parts)) => parts
            .iter()
            .map(|p| p.as_str().map(str::to_string).unwrap_or_else(|| p.to_string()))
            .collect::<Vec<_>>()
            .join(", "),
        Some(other) if !other.is_null() => other.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wrap(results: Value) -> Value {
        json!({ "data": { "actor": { "account": { "nrql": { "results": results } } } } })
    }

    #[test]
    fn test_graphql_query_embeds_account_and_nrql() {
        let q = graphql_query(4120837, "SELECT 1 FROM X SINCE 'a'");
        assert!(q.contains("account(id: 4120837)"));
        assert!(q.contains("nrql(query: \"SELECT 1 FROM X SINCE 'a'\")"));
        assert!(q.contains("results"));
    }

    #[test]
    fn test_parse_system_sample() {
        let response = wrap(json!([{
            "facet": "web-1",
            "average.cpuPercent": 85.5,
            "average.memoryUsedPercent": 40.0,
            "average.memoryUsedBytes": 8589934592.0,
            "average.loadAverageOneMinute": 2.0,
            "latest.coreCount": 4,
            "latest.instanceType": "m5.xlarge"
        }]));
        let samples = parse_system_samples(&response).unwrap();
        assert_eq!(samples.len(), 1);
        let s = &samples[0];
        assert_eq!(s.hostname, "web-1");
        assert_eq!(s.core_count, 4);
        assert_eq!(s.cpu_percent, 85.5);
        assert_eq!(s.memory_used_gib(), 8.0);
        assert_eq!(s.instance_type, "m5.xlarge");
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let response = wrap(json!([{ "facet": "bare", "average.cpuPercent": null }]));
        let s = &parse_system_samples(&response).unwrap()[0];
        assert_eq!(s.core_count, 0);
        assert_eq!(s.cpu_percent, 0.0);
        assert_eq!(s.memory_used_bytes, 0.0);
        assert_eq!(s.load_average_one_minute, 0.0);
        assert_eq!(s.instance_type, "Unknown");

        let d = &parse_storage_samples(&wrap(json!([{ "facet": "bare" }]))).unwrap()[0];
        assert_eq!(d.current_size, 0.0);
        assert_eq!(d.quarter_estimate_size, 0.0);
    }

    #[test]
    fn test_fractional_core_count_truncates() {
        let response = wrap(json!([{ "facet": "h", "latest.coreCount": 3.9 }]));
        assert_eq!(parse_system_samples(&response).unwrap()[0].core_count, 3);
    }

    #[test]
    fn test_parse_storage_sample_keeps_order() {
        let response = wrap(json!([
            { "facet": "db-2", "currentSize": 95.0, "weekEstimateSize": 97.1,
              "monthEstimateSize": 101.3, "quarterEstimateSize": 120.0 },
            { "facet": "db-1", "currentSize": 50.0, "weekEstimateSize": 50.2,
              "monthEstimateSize": 51.0, "quarterEstimateSize": 53.5 }
        ]));
        let samples = parse_storage_samples(&response).unwrap();
        assert_eq!(samples[0].hostname, "db-2");
        assert_eq!(samples[0].month_estimate_size, 101.3);
        assert_eq!(samples[1].hostname, "db-1");
    }

    #[test]
    fn test_errors_member_is_api_error() {
        let response = json!({ "errors": [{ "message": "Invalid API key" }] });
        let err = parse_system_samples(&response).unwrap_err();
        assert!(matches!(err, SourceError::Api(ref m) if m.contains("Invalid API key")));
    }

    #[test]
    fn test_missing_results_path() {
        let err = nrql_results(&json!({ "data": {} })).unwrap_err();
        assert!(matches!(err, SourceError::MissingField(_)));
    }

    #[test]
    fn test_array_facet_is_joined() {
        let response = wrap(json!([{ "facet": ["web-1", "us-east-1"] }]));
        assert_eq!(parse_system_samples(&response).unwrap()[0].hostname, "web-1, us-east-1");
    }
}
