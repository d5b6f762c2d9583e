//! Search request lifecycle.
//!
//! [`SearchController`] owns the query being typed and the outcome of the
//! latest search. A search is started with [`SearchController::begin`], which
//! hands out a [`SearchTicket`]; whoever runs the HTTP call passes the ticket
//! back to [`SearchController::settle`] together with the outcome.

use std::str::FromStr;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::api::ArticleSource;
use crate::error::{ConfigError, SearchError};
use crate::model::Article;

/// The only error text the user ever sees.
pub const SEARCH_FAILED: &str = "Error fetching news";

/// What to do with a response when more than one search is in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverlapPolicy {
    /// Apply every response as it arrives; the last one to resolve wins.
    #[default]
    LastResolved,
    /// Drop responses belonging to anything but the newest submission.
    LatestSubmitted,
}

impl FromStr for OverlapPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "last-resolved" => Ok(Self::LastResolved),
            "latest-submitted" => Ok(Self::LatestSubmitted),
            other => Err(ConfigError::InvalidPolicy(other.to_string())),
        }
    }
}

/// Outcome of the most recent search. Results from an earlier success stay
/// visible while loading and after a failure.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SearchState {
    #[default]
    Idle,
    Loading {
        previous: Vec<Article>,
    },
    Success(Vec<Article>),
    Failure {
        message: &'static str,
        previous: Vec<Article>,
    },
}

impl SearchState {
    pub fn results(&self) -> &[Article] {
        match self {
            Self::Idle => &[],
            Self::Loading { previous } | Self::Failure { previous, .. } => previous.as_slice(),
            Self::Success(results) => results.as_slice(),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// Empty unless the last settled search failed.
    pub fn error(&self) -> &str {
        match self {
            Self::Failure { message, .. } => *message,
            _ => "",
        }
    }

    fn take_results(&mut self) -> Vec<Article> {
        match std::mem::take(self) {
            Self::Idle => Vec::new(),
            Self::Loading { previous } | Self::Failure { previous, .. } => previous,
            Self::Success(results) => results,
        }
    }
}

/// Handle for one issued request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    generation: u64,
    query: String,
}

impl SearchTicket {
    pub fn query(&self) -> &str {
        &self.query
    }
}

#[derive(Debug)]
pub struct SearchController {
    query: String,
    state: SearchState,
    policy: OverlapPolicy,
    latest_generation: u64,
}

impl SearchController {
    pub fn new(policy: OverlapPolicy) -> Self {
        Self {
            query: String::new(),
            state: SearchState::Idle,
            policy,
            latest_generation: 0,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
    }

    pub fn pop_char(&mut self) {
        self.query.pop();
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn results(&self) -> &[Article] {
        self.state.results()
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn error(&self) -> &str {
        self.state.error()
    }

    /// Start a search for the current query. Returns `None` and changes
    /// nothing when the query is blank.
    pub fn begin(&mut self) -> Option<SearchTicket> {
        if self.query.trim().is_empty() {
            return None;
        }

        self.latest_generation += 1;
        let previous = self.state.take_results();
        self.state = SearchState::Loading { previous };

        debug!(generation = self.latest_generation, query = %self.query, "search started");
        Some(SearchTicket {
            generation: self.latest_generation,
            query: self.query.clone(),
        })
    }

    /// Apply the outcome of a request started by [`begin`](Self::begin).
    /// Returns `false` if the overlap policy discarded it.
    pub fn settle(
        &mut self,
        ticket: &SearchTicket,
        outcome: Result<Vec<Article>, SearchError>,
    ) -> bool {
        if self.policy == OverlapPolicy::LatestSubmitted
            && ticket.generation < self.latest_generation
        {
            debug!(
                generation = ticket.generation,
                latest = self.latest_generation,
                "discarding superseded search response"
            );
            return false;
        }

        self.state = match outcome {
            Ok(articles) => {
                info!(
                    generation = ticket.generation,
                    count = articles.len(),
                    "search succeeded"
                );
                SearchState::Success(articles)
            }
            Err(e) => {
                warn!(generation = ticket.generation, error = %e, "search failed");
                SearchState::Failure {
                    message: SEARCH_FAILED,
                    previous: self.state.take_results(),
                }
            }
        };
        true
    }

    /// Run a whole search inline against `source`.
    pub async fn submit_search(&mut self, source: &dyn ArticleSource) {
        let Some(ticket) = self.begin() else {
            return;
        };
        let outcome = source.search(ticket.query()).await;
        self.settle(&ticket, outcome);
    }
}
