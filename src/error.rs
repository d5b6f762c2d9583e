use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Why a single search request failed. The controller never shows these to
/// the user; they only reach the log.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Never carries the request URL, which holds the API key.
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("server returned {0}")]
    Status(StatusCode),

    #[error("malformed response: {0}")]
    Payload(#[from] serde_json::Error),
}

impl From<reqwest::Error> for SearchError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.without_url())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("no API key: pass --api-key, set NEWS_API_KEY, or add api_key to the config file")]
    MissingApiKey,

    #[error("unknown overlap policy {0:?} (expected \"last-resolved\" or \"latest-submitted\")")]
    InvalidPolicy(String),
}
