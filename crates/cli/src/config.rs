//! Configuration management for the CLI
//!
//! Settings are layered: built-in defaults, then the YAML file, then
//! `RIGHTSIZE_*` environment variables.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use sizing_lib::source::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};
use sizing_lib::{DiskThresholds, SizeCatalog, SizeCatalogEntry, SizingThresholds};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default configuration file name, looked up in the working directory
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Environment variable prefix
const ENV_PREFIX: &str = "RIGHTSIZE";

/// CLI settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// New Relic user API key
    #[serde(default)]
    pub api_key: Option<String>,

    /// New Relic account queried by the report
    #[serde(default)]
    pub account_id: Option<u64>,

    /// NerdGraph endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Currency used when rendering costs
    #[serde(default = "default_currency")]
    pub currency: String,

    #[serde(default)]
    pub thresholds: ThresholdSettings,

    /// Size catalog, in priority order for cost ties
    #[serde(default)]
    pub sizes: Vec<SizeCatalogEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThresholdSettings {
    #[serde(default)]
    pub sizing: SizingThresholds,
    #[serde(default)]
    pub disk: DiskThresholds,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

fn default_currency() -> String {
    "USD".to_string()
}

impl Settings {
    /// Load settings from `path`, or from the default locations
    ///
    /// An explicit path must exist. Without one, `./config.yaml` is tried and
    /// then `~/.config/rightsize/config.yaml`; environment variables apply
    /// either way.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Load settings reading `RIGHTSIZE_*` overrides from `env` instead of
    /// the process environment when given
    fn load_with_env(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self> {
        let file = match path {
            Some(p) if !p.exists() => bail!("Config file not found: {}", p.display()),
            Some(p) => Some(p.to_path_buf()),
            None => default_config_path(),
        };

        let mut builder = config::Config::builder();
        if let Some(file) = &file {
            tracing::debug!(path = %file.display(), "Loading configuration file");
            builder = builder.add_source(
                config::File::from(file.as_path()).format(config::FileFormat::Yaml),
            );
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .source(env),
        );

        builder
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Failed to parse configuration")
    }

    /// Validated size catalog
    pub fn catalog(&self) -> Result<SizeCatalog> {
        SizeCatalog::new(self.sizes.clone()).context("Invalid size catalog in configuration")
    }

    /// API key and account id, both required to query New Relic
    pub fn credentials(&self) -> Result<(&str, u64)> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .context("api_key is not configured (set it in config.yaml or RIGHTSIZE_API_KEY)")?;
        let account_id = self
            .account_id
            .context("account_id is not configured (set it in config.yaml or RIGHTSIZE_ACCOUNT_ID)")?;
        Ok((api_key, account_id))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// First existing default configuration file
fn default_config_path() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }

    dirs_next::home_dir()
        .map(|home| home.join(".config").join("rightsize").join(CONFIG_FILE_NAME))
        .filter(|p| p.exists())
}
