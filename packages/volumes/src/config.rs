//! Client configuration.
//!
//! A [`ClientConfig`] can be read from `IFSVOL_*` environment variables or
//! from a JSON file, and turned into a ready [`HttpClient`] with
//! [`ClientConfig::connect`].

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use ifsvol_http::ReqwestExecutor;

use crate::client::HttpClient;
use crate::path::DEFAULT_VOLUMES_PATH;

pub const ENV_ENDPOINT: &str = "IFSVOL_ENDPOINT";
pub const ENV_USER: &str = "IFSVOL_USER";
pub const ENV_GROUP: &str = "IFSVOL_GROUP";
pub const ENV_PASSWORD: &str = "IFSVOL_PASSWORD";
pub const ENV_VOLUMES_PATH: &str = "IFSVOL_VOLUMES_PATH";
pub const ENV_INSECURE: &str = "IFSVOL_INSECURE";
pub const ENV_TIMEOUT_SECS: &str = "IFSVOL_TIMEOUT_SECS";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("missing configuration value {name}")]
    Missing { name: &'static str },

    #[error("invalid value {value:?} for {name}")]
    Invalid { name: &'static str, value: String },

    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to build transport: {0}")]
    Transport(#[from] ifsvol_http::Error),
}

/// Connection and identity settings for one array.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the array's API, e.g. `https://cluster:8080`.
    pub endpoint: String,
    pub user: String,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_volumes_path")]
    pub volumes_path: String,
    /// Skip TLS certificate verification.
    #[serde(default)]
    pub insecure: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_volumes_path() -> String {
    DEFAULT_VOLUMES_PATH.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl ClientConfig {
    pub fn new(endpoint: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            user: user.into(),
            group: String::new(),
            password: None,
            volumes_path: default_volumes_path(),
            insecure: false,
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    /// Read the configuration from `IFSVOL_*` key/value pairs.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let mut required = |name: &'static str| {
            vars.remove(name)
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing { name })
        };
        let endpoint = required(ENV_ENDPOINT)?;
        let user = required(ENV_USER)?;

        let mut config = Self::new(endpoint, user);
        if let Some(group) = vars.remove(ENV_GROUP) {
            config.group = group;
        }
        config.password = vars.remove(ENV_PASSWORD).filter(|p| !p.is_empty());
        if let Some(path) = vars.remove(ENV_VOLUMES_PATH).filter(|p| !p.is_empty()) {
            config.volumes_path = path;
        }
        if let Some(value) = vars.remove(ENV_INSECURE) {
            config.insecure = parse_bool(ENV_INSECURE, value)?;
        }
        if let Some(value) = vars.remove(ENV_TIMEOUT_SECS) {
            config.timeout_secs = value.parse().map_err(|_| ConfigError::Invalid {
                name: ENV_TIMEOUT_SECS,
                value,
            })?;
        }

        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Build a client that talks to the configured array.
    pub fn connect(&self) -> Result<HttpClient<ReqwestExecutor>, ConfigError> {
        let mut executor = if self.insecure {
            ReqwestExecutor::insecure(&self.endpoint, self.timeout())?
        } else {
            ReqwestExecutor::new(&self.endpoint, self.timeout())?
        };
        if let Some(password) = &self.password {
            executor = executor.with_basic_auth(self.user.as_str(), password.as_str());
        }

        tracing::debug!(endpoint = %self.endpoint, user = %self.user, "connecting to array");

        Ok(HttpClient::new(executor, self.user.as_str())
            .with_group(self.group.as_str())
            .with_volumes_path(self.volumes_path.as_str()))
    }
}

fn parse_bool(name: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "" | "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigError::Invalid { name, value }),
    }
}
