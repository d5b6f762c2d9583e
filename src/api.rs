use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};

use crate::config::Config;
use crate::error::SearchError;
use crate::model::{Article, SearchResponse};

const USER_AGENT: &str = concat!("newsearch/", env!("CARGO_PKG_VERSION"), " (Rust; TUI)");

/// Anything that can answer a search query with a list of articles.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<Article>, SearchError>;
}

/// Client for the NewsAPI `everything` endpoint.
#[derive(Clone)]
pub struct NewsApiClient {
    http: Client,
    endpoint: Arc<str>,
    api_key: Arc<str>,
}

impl NewsApiClient {
    pub fn new(config: &Config) -> Result<Self, SearchError> {
        Ok(Self::with_client(
            Self::http_builder(config).build()?,
            &config.endpoint,
            &config.api_key,
        ))
    }

    /// HTTP client settings derived from `config`. No timeout unless one is
    /// configured.
    pub fn http_builder(config: &Config) -> ClientBuilder {
        let builder = Client::builder().user_agent(USER_AGENT);
        match config.request_timeout {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        }
    }

    pub fn with_client(http: Client, endpoint: &str, api_key: &str) -> Self {
        Self {
            http,
            endpoint: Arc::from(endpoint),
            api_key: Arc::from(api_key),
        }
    }
}

#[async_trait]
impl ArticleSource for NewsApiClient {
    async fn search(&self, query: &str) -> Result<Vec<Article>, SearchError> {
        let response = self
            .http
            .get(&*self.endpoint)
            .query(&[("q", query), ("apiKey", &*self.api_key)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status(status));
        }

        let bytes = response.bytes().await?;
        let parsed: SearchResponse = serde_json::from_slice(&bytes)?;
        Ok(parsed.articles)
    }
}
