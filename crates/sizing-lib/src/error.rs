//! Error types

use thiserror::Error;

/// Rejection reasons for a configured size catalog
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("size catalog is empty")]
    Empty,

    #[error("catalog entry {index} has an empty name")]
    MissingName { index: usize },

    #[error("catalog entry '{name}' has invalid {field}: {value}")]
    InvalidValue {
        name: String,
        field: &'static str,
        value: f64,
    },
}

/// Failures talking to the metrics source
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request to metrics source failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("metrics source returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("metrics source reported errors: {0}")]
    Api(String),

    #[error("metrics response is missing {0}")]
    MissingField(&'static str),

    #[error("invalid metrics source endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed metrics response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Run-level failures of the sizing engine
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no {0} samples were returned by the metrics source")]
    MissingSamples(&'static str),
}
