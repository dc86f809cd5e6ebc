//! Candidate Discovery
//!
//! One rate-limited pull of the latest-token-profiles feed, narrowed to the
//! watched chain. Upstream trouble is logged and becomes an empty batch -
//! discovery never fails its caller.

use std::sync::Arc;

use crate::domain::rate_limiter::RateLimiter;
use crate::ports::models::Candidate;
use crate::ports::sources::DiscoverySource;

pub struct Discovery {
    source: Arc<dyn DiscoverySource>,
    limiter: Arc<RateLimiter>,
    target_chain: String,
}

impl Discovery {
    pub fn new(
        source: Arc<dyn DiscoverySource>,
        limiter: Arc<RateLimiter>,
        target_chain: impl Into<String>,
    ) -> Self {
        Self {
            source,
            limiter,
            target_chain: target_chain.into(),
        }
    }

    /// Fetch one fresh batch of candidates on the watched chain.
    pub async fn fetch(&self) -> Vec<Candidate> {
        self.limiter.acquire().await;

        let batch = match self.source.latest_profiles().await {
            Ok(batch) => batch,
            Err(e) => {
                tracing::error!("Error fetching latest tokens: {}", e);
                return Vec::new();
            }
        };

        batch
            .into_iter()
            .filter(|c| c.chain_id == self.target_chain && !c.token_address.trim().is_empty())
            .collect()
    }
}
