//! Configuration for newsearch.
//!
//! Values come from three layers: command-line flags (which also pick up
//! `NEWS_API_KEY` from the environment), an optional TOML file, and the API
//! key captured at build time. Earlier layers win.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::search::OverlapPolicy;

pub const DEFAULT_ENDPOINT: &str = "https://newsapi.org/v2/everything";

/// API key baked in when the binary was built with `NEWS_API_KEY` set.
pub const BUILD_API_KEY: Option<&str> = option_env!("NEWS_API_KEY");

/// Contents of `config.toml`. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub overlap_policy: Option<OverlapPolicy>,
    pub log_file: Option<PathBuf>,
}

impl FileConfig {
    /// Load a config file the user asked for explicitly. A missing file is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the config file at its default location, if there is one.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = default_config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(&path)
    }
}

/// Values supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub overlap_policy: Option<OverlapPolicy>,
    pub log_file: Option<PathBuf>,
}

/// Fully resolved settings handed to the client and controller at startup.
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub endpoint: String,
    /// `None` means requests may wait forever.
    pub request_timeout: Option<Duration>,
    pub overlap_policy: OverlapPolicy,
    pub log_file: PathBuf,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("request_timeout", &self.request_timeout)
            .field("overlap_policy", &self.overlap_policy)
            .field("log_file", &self.log_file)
            .finish()
    }
}

impl Config {
    pub fn resolve(
        file: FileConfig,
        overrides: Overrides,
        build_key: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let api_key = non_empty(overrides.api_key)
            .or_else(|| non_empty(file.api_key))
            .or_else(|| non_empty(build_key.map(str::to_string)))
            .ok_or(ConfigError::MissingApiKey)?;

        let endpoint = non_empty(overrides.endpoint)
            .or_else(|| non_empty(file.endpoint))
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let request_timeout = overrides
            .request_timeout_secs
            .or(file.request_timeout_secs)
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Ok(Self {
            api_key,
            endpoint,
            request_timeout,
            overlap_policy: overrides
                .overlap_policy
                .or(file.overlap_policy)
                .unwrap_or_default(),
            log_file: overrides
                .log_file
                .or(file.log_file)
                .unwrap_or_else(default_log_path),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn default_config_path() -> PathBuf {
    xdg_dir("XDG_CONFIG_HOME", ".config")
        .map(|dir| dir.join("newsearch").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("newsearch.toml"))
}

pub fn default_log_path() -> PathBuf {
    xdg_dir("XDG_STATE_HOME", ".local/state")
        .map(|dir| dir.join("newsearch").join("newsearch.log"))
        .unwrap_or_else(|| std::env::temp_dir().join("newsearch.log"))
}

fn xdg_dir(var: &str, home_relative: &str) -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os(var).filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(dir));
    }
    std::env::var_os("HOME")
        .filter(|v| !v.is_empty())
        .map(|home| PathBuf::from(home).join(home_relative))
}
