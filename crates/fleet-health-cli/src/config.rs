//! Configuration loading
//!
//! The config file is YAML by default; `.json` and `.toml` files are parsed
//! by extension. Connection keys can be overridden from the environment using
//! the `MUNKIREPORT__<KEY>` convention (namespace and key joined with `__`).

use fleet_health_client::{MunkireportClientConfig, DEFAULT_TIMEOUT_SECS};
use fleet_health_core::ExclusionSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Config file read when none is given
pub const DEFAULT_CONFIG_PATH: &str = "munkireport-parser.yml";

/// Namespace for environment overrides
pub const ENV_NAMESPACE: &str = "MUNKIREPORT";

/// Keys every config must provide
pub const REQUIRED_PARAMETERS: [&str; 3] = ["base_url", "username", "password"];

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {message}")]
    Read { path: String, message: String },

    #[error("Failed to load {format} config: {message}")]
    Parse { format: &'static str, message: String },

    #[error("'{0}' parameter is missing in the config")]
    MissingParameter(&'static str),

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),
}

/// Config file contents before validation
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    base_url: Option<String>,
    username: Option<String>,
    password: Option<String>,
    excluded: Option<Vec<String>>,
    timeout_secs: Option<u64>,
}

/// Validated run configuration
#[derive(Clone)]
pub struct ReportConfig {
    pub base_url: String,
    pub username: String,
    pub password: String,
    /// Companies never reported on
    pub excluded: ExclusionSet,
    /// Upstream request timeout
    pub timeout_secs: u64,
}

impl ReportConfig {
    /// Connection settings for the Munkireport client
    pub fn client_config(&self) -> MunkireportClientConfig {
        MunkireportClientConfig::new(&self.base_url, &self.username, &self.password)
            .with_timeout(Duration::from_secs(self.timeout_secs))
    }

    /// Serializable view with the password masked
    pub fn redacted(&self) -> RedactedConfig<'_> {
        RedactedConfig {
            base_url: &self.base_url,
            username: &self.username,
            password: "***",
            excluded: &self.excluded,
            timeout_secs: self.timeout_secs,
        }
    }
}

impl fmt::Debug for ReportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.redacted(), f)
    }
}

/// Config with secrets masked, for display
#[derive(Debug, Serialize)]
pub struct RedactedConfig<'a> {
    pub base_url: &'a str,
    pub username: &'a str,
    pub password: &'a str,
    pub excluded: &'a ExclusionSet,
    pub timeout_secs: u64,
}

/// Name of the environment variable overriding `key`
pub fn env_key(key: &str) -> String {
    format!("{}__{}", ENV_NAMESPACE, key).to_uppercase()
}

/// Load and validate a config file, applying environment overrides
pub fn load_config(path: &Path) -> Result<ReportConfig, ConfigError> {
    let content = read_config_file(path)?;
    parse_config(path, &content, |key| std::env::var(key).ok())
}

/// Read only the exclusion list, tolerating a missing file
///
/// Used when records come from a saved dump and no connection is needed.
pub fn load_exclusions(path: &Path) -> Result<ExclusionSet, ConfigError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No config file, nothing excluded");
        return Ok(ExclusionSet::new());
    }
    let content = read_config_file(path)?;
    let raw = parse_raw(path, &content)?;
    Ok(raw.excluded.unwrap_or_default().into_iter().collect())
}

/// Parse config text, resolving overrides through `env`
pub fn parse_config<F>(path: &Path, content: &str, env: F) -> Result<ReportConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut raw = parse_raw(path, content)?;

    for (key, slot) in [
        ("base_url", &mut raw.base_url),
        ("username", &mut raw.username),
        ("password", &mut raw.password),
    ] {
        if let Some(value) = env(&env_key(key)) {
            tracing::debug!(key, "Config value overridden from environment");
            *slot = Some(value);
        }
    }

    let base_url = raw.base_url.ok_or(ConfigError::MissingParameter(REQUIRED_PARAMETERS[0]))?;
    let username = raw.username.ok_or(ConfigError::MissingParameter(REQUIRED_PARAMETERS[1]))?;
    let password = raw.password.ok_or(ConfigError::MissingParameter(REQUIRED_PARAMETERS[2]))?;

    Ok(ReportConfig {
        base_url,
        username,
        password,
        excluded: raw.excluded.unwrap_or_default().into_iter().collect(),
        timeout_secs: raw.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
    })
}

fn read_config_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

fn parse_raw(path: &Path, content: &str) -> Result<RawConfig, ConfigError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase);

    match extension.as_deref() {
        None | Some("yml") | Some("yaml") => {
            serde_yaml::from_str(content).map_err(|e| ConfigError::Parse {
                format: "YAML",
                message: e.to_string(),
            })
        }
        Some("json") => serde_json::from_str(content).map_err(|e| ConfigError::Parse {
            format: "JSON",
            message: e.to_string(),
        }),
        Some("toml") => toml::from_str(content).map_err(|e| ConfigError::Parse {
            format: "TOML",
            message: e.to_string(),
        }),
        Some(other) => Err(ConfigError::UnsupportedFormat(other.to_string())),
    }
}
