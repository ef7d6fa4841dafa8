//! Configuration loading for the Airbyte provider.
//!
//! Loads layered `.env` files and environment variables prefixed with
//! `AIRBYTE_`, producing a typed [`ProviderConfig`].

use std::{collections::BTreeMap, env, path::PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;
use url::Url;

const ENV_PREFIX: &str = "AIRBYTE_";

/// Provider configuration derived from `AIRBYTE_*` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct ProviderConfig {
    #[serde(default = "default_profile")]
    pub profile: String,
    /// Base URL of the Airbyte server, without the `/api/v1` suffix.
    ///
    /// Environment variable: `AIRBYTE_URL`
    #[serde(default = "default_host_url")]
    pub host_url: String,
    /// Basic auth username. Basic auth is only sent when both username and password are set.
    ///
    /// Environment variable: `AIRBYTE_USERNAME`
    #[serde(default = "default_username")]
    pub username: String,
    /// Environment variable: `AIRBYTE_PASSWORD`
    #[serde(default = "default_password")]
    pub password: String,
    /// Extra headers added to every request. A `Host` entry overrides the Host header.
    ///
    /// Environment variable: `AIRBYTE_ADDITIONAL_HEADERS` (`Name=Value,Name=Value`)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub additional_headers: BTreeMap<String, String>,
    /// Environment variable: `AIRBYTE_TIMEOUT`
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Run `check_connection` before creating or updating sources and destinations.
    ///
    /// Environment variable: `AIRBYTE_CHECK_CONNECTORS`
    #[serde(default)]
    pub check_connectors: bool,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_format")]
    pub log_format: String,
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Transport retry settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct RetryConfig {
    /// Retries after the first attempt (default: 4)
    ///
    /// Environment variable: `AIRBYTE_MAX_RETRIES`
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Starting backoff in milliseconds (default: 1000)
    ///
    /// Environment variable: `AIRBYTE_RETRY_BASE_DELAY_MS`
    #[serde(default = "default_retry_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Upper bound for backoff in milliseconds (default: 30000)
    ///
    /// Environment variable: `AIRBYTE_RETRY_MAX_DELAY_MS`
    #[serde(default = "default_retry_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Environment variable: `AIRBYTE_RETRY_JITTER_FACTOR`
    #[serde(default = "default_retry_jitter_factor")]
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_retry_base_delay_ms(),
            max_delay_ms: default_retry_max_delay_ms(),
            jitter_factor: default_retry_jitter_factor(),
        }
    }
}

impl RetryConfig {
    /// Validate retry bounds
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_delay_ms > self.max_delay_ms {
            return Err(ConfigError::InvalidRetryBounds {
                base: self.base_delay_ms,
                max: self.max_delay_ms,
            });
        }

        if !(0.0..=1.0).contains(&self.jitter_factor) {
            return Err(ConfigError::InvalidRetryJitter {
                value: self.jitter_factor,
            });
        }

        Ok(())
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            profile: default_profile(),
            host_url: default_host_url(),
            username: default_username(),
            password: default_password(),
            additional_headers: BTreeMap::new(),
            timeout_seconds: default_timeout_seconds(),
            check_connectors: false,
            log_level: default_log_level(),
            log_format: default_log_format(),
            retry: RetryConfig::default(),
        }
    }
}

impl ProviderConfig {
    /// Returns a redacted JSON representation (secrets are redacted).
    pub fn redacted_json(&self) -> serde_json::Result<String> {
        let mut config = self.clone();
        if !config.password.is_empty() {
            config.password = "[REDACTED]".to_string();
        }
        // Header values routinely carry tokens
        for value in config.additional_headers.values_mut() {
            *value = "[REDACTED]".to_string();
        }
        serde_json::to_string_pretty(&config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host_url.trim().is_empty() {
            return Err(ConfigError::MissingHostUrl);
        }

        match Url::parse(&self.host_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {}
            Ok(_) => {
                return Err(ConfigError::InvalidHostUrl {
                    value: self.host_url.clone(),
                    reason: "expected an absolute http(s) URL".to_string(),
                });
            }
            Err(err) => {
                return Err(ConfigError::InvalidHostUrl {
                    value: self.host_url.clone(),
                    reason: err.to_string(),
                });
            }
        }

        if self.timeout_seconds == 0 {
            return Err(ConfigError::InvalidTimeout {
                value: self.timeout_seconds,
            });
        }

        if !matches!(self.log_format.as_str(), "json" | "pretty") {
            return Err(ConfigError::InvalidLogFormat {
                value: self.log_format.clone(),
            });
        }

        self.retry.validate()?;

        Ok(())
    }
}

fn default_profile() -> String {
    "local".to_string()
}

fn default_host_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_username() -> String {
    "airbyte".to_string()
}

fn default_password() -> String {
    "password".to_string()
}

fn default_timeout_seconds() -> u64 {
    600 // 10 minutes, discover and check jobs are slow
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_max_retries() -> u32 {
    4
}

fn default_retry_base_delay_ms() -> u64 {
    1000 // 1 second
}

fn default_retry_max_delay_ms() -> u64 {
    30000 // 30 seconds
}

fn default_retry_jitter_factor() -> f64 {
    0.1 // 10% jitter
}

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load environment file {path}: {source}")]
    EnvFile {
        path: PathBuf,
        source: dotenvy::Error,
    },
    #[error("host URL is empty; set AIRBYTE_URL or leave it unset for the default")]
    MissingHostUrl,
    #[error("invalid host URL '{value}': {reason}")]
    InvalidHostUrl { value: String, reason: String },
    #[error("timeout must be at least 1 second, got {value}")]
    InvalidTimeout { value: u64 },
    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },
    #[error("additional header entry '{entry}' must have the form Name=Value")]
    InvalidAdditionalHeader { entry: String },
    #[error("log format must be 'json' or 'pretty', got '{value}'")]
    InvalidLogFormat { value: String },
    #[error("retry base delay ({base} ms) cannot be greater than max delay ({max} ms)")]
    InvalidRetryBounds { base: u64, max: u64 },
    #[error("retry jitter factor must be between 0.0 and 1.0, got {value}")]
    InvalidRetryJitter { value: f64 },
}

/// Loads configuration using layered `.env` files and `AIRBYTE_*` env vars.
pub struct ConfigLoader {
    base_dir: PathBuf,
}

impl ConfigLoader {
    /// Creates a new loader rooted at the current working directory.
    pub fn new() -> Self {
        Self {
            base_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    /// Creates a loader rooted at the provided directory (useful for tests).
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Loads and validates configuration.
    pub fn load(&self) -> Result<ProviderConfig, ConfigError> {
        let (mut layered, profile_hint) = self.collect_layered_env()?;

        // Overlay process environment last so it wins.
        for (key, value) in env::vars() {
            if let Some(stripped) = key.strip_prefix(ENV_PREFIX) {
                layered.insert(stripped.to_string(), value);
            }
        }

        let profile = layered
            .remove("PROFILE")
            .filter(|v| !v.is_empty())
            .unwrap_or(profile_hint);
        // An explicitly empty URL is an error rather than a silent fallback to localhost.
        let host_url = layered.remove("URL").unwrap_or_else(default_host_url);
        let username = layered.remove("USERNAME").unwrap_or_else(default_username);
        if username.is_empty() {
            warn!("AIRBYTE_USERNAME is empty; requests will be sent without basic auth");
        }
        let password = layered.remove("PASSWORD").unwrap_or_else(default_password);
        let additional_headers = match layered.remove("ADDITIONAL_HEADERS") {
            Some(raw) => parse_headers(&raw)?,
            None => BTreeMap::new(),
        };
        let timeout_seconds = parse_or(&mut layered, "TIMEOUT", default_timeout_seconds)?;
        let check_connectors = parse_or(&mut layered, "CHECK_CONNECTORS", || false)?;
        let log_level = layered
            .remove("LOG_LEVEL")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(default_log_level);
        let log_format = layered
            .remove("LOG_FORMAT")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(default_log_format);

        let retry = RetryConfig {
            max_retries: parse_or(&mut layered, "MAX_RETRIES", default_max_retries)?,
            base_delay_ms: parse_or(&mut layered, "RETRY_BASE_DELAY_MS", default_retry_base_delay_ms)?,
            max_delay_ms: parse_or(&mut layered, "RETRY_MAX_DELAY_MS", default_retry_max_delay_ms)?,
            jitter_factor: parse_or(&mut layered, "RETRY_JITTER_FACTOR", default_retry_jitter_factor)?,
        };

        let config = ProviderConfig {
            profile,
            host_url,
            username,
            password,
            additional_headers,
            timeout_seconds,
            check_connectors,
            log_level,
            log_format,
            retry,
        };

        config.validate()?;
        Ok(config)
    }

    fn collect_layered_env(&self) -> Result<(BTreeMap<String, String>, String), ConfigError> {
        let mut values = BTreeMap::new();

        self.merge_dotenv(self.base_dir.join(".env"), &mut values)?;
        self.merge_dotenv(self.base_dir.join(".env.local"), &mut values)?;

        let profile = env::var("AIRBYTE_PROFILE")
            .ok()
            .or_else(|| values.get("PROFILE").cloned())
            .unwrap_or_else(default_profile);

        self.merge_dotenv(
            self.base_dir.join(format!(".env.{}", &profile)),
            &mut values,
        )?;
        self.merge_dotenv(
            self.base_dir.join(format!(".env.{}.local", &profile)),
            &mut values,
        )?;

        Ok((values, profile))
    }

    fn merge_dotenv(
        &self,
        path: PathBuf,
        values: &mut BTreeMap<String, String>,
    ) -> Result<(), ConfigError> {
        match dotenvy::from_path_iter(&path) {
            Ok(iter) => {
                for item in iter {
                    let (key, value) = item.map_err(|source| ConfigError::EnvFile {
                        path: path.clone(),
                        source,
                    })?;
                    if let Some(stripped) = key.strip_prefix(ENV_PREFIX) {
                        values.insert(stripped.to_string(), value);
                    }
                }
                Ok(())
            }
            Err(dotenvy::Error::Io(ref io_err))
                if io_err.kind() == std::io::ErrorKind::NotFound =>
            {
                Ok(())
            }
            Err(err) => Err(ConfigError::EnvFile { path, source: err }),
        }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses a layered value, falling back to `default` when unset or blank.
fn parse_or<T, F>(
    layered: &mut BTreeMap<String, String>,
    key: &str,
    default: F,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    F: FnOnce() -> T,
{
    match layered.remove(key).filter(|v| !v.trim().is_empty()) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                key: format!("{ENV_PREFIX}{key}"),
                value: raw,
            }),
        None => Ok(default()),
    }
}

/// Parses `Name=Value,Name=Value` into a header map.
fn parse_headers(raw: &str) -> Result<BTreeMap<String, String>, ConfigError> {
    let mut headers = BTreeMap::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (name, value) = entry
            .split_once('=')
            .map(|(n, v)| (n.trim(), v.trim()))
            .filter(|(n, _)| !n.is_empty())
            .ok_or_else(|| ConfigError::InvalidAdditionalHeader {
                entry: entry.to_string(),
            })?;
        headers.insert(name.to_string(), value.to_string());
    }
    Ok(headers)
}
