//! Upstream feed ports: discovery and per-token pair data.

use async_trait::async_trait;
use thiserror::Error;

use super::models::{Candidate, PairRecord};

/// Feed error type shared by both upstream endpoints.
///
/// Every variant is transient from the watcher's point of view: callers log
/// it and treat the call as "no data this cycle".
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP error: {0}")]
    HttpError(String),
    #[error("Unexpected status: {0}")]
    BadStatus(u16),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Unexpected response structure")]
    UnexpectedShape,
}

impl From<reqwest::Error> for FeedError {
    fn from(e: reqwest::Error) -> Self {
        FeedError::HttpError(e.to_string())
    }
}

/// The latest-token-profiles feed. One call returns one finite batch.
#[async_trait]
pub trait DiscoverySource: Send + Sync {
    /// Fetch the current batch of newly listed tokens, unfiltered.
    async fn latest_profiles(&self) -> Result<Vec<Candidate>, FeedError>;
}

/// The per-token pair feed.
#[async_trait]
pub trait PairSource: Send + Sync {
    /// Fetch all trading pairs for one token on one chain.
    async fn token_pairs(
        &self,
        chain_id: &str,
        token_address: &str,
    ) -> Result<Vec<PairRecord>, FeedError>;
}
