//! DexScreener HTTP client implementing both feed ports.
//!
//! Rate limiting lives in the application layer (each caller owns its
//! endpoint limiter); this client only does transport: fixed timeout,
//! status check, tolerant parsing.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::types::{PairData, ProfilesResponse};
use crate::ports::models::{Candidate, PairRecord};
use crate::ports::sources::{DiscoverySource, FeedError, PairSource};

pub const DEFAULT_PROFILES_URL: &str = "https://api.dexscreener.com/token-profiles/latest/v1";
pub const DEFAULT_PAIRS_URL: &str = "https://api.dexscreener.com/token-pairs/v1";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct DexScreenerClient {
    http: Client,
    profiles_url: String,
    pairs_url: String,
}

impl DexScreenerClient {
    pub fn new(
        profiles_url: impl Into<String>,
        pairs_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, FeedError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FeedError::HttpError(e.to_string()))?;

        Ok(Self {
            http,
            profiles_url: profiles_url.into(),
            pairs_url: pairs_url.into(),
        })
    }

    /// Client for the public API with default endpoints and timeout.
    pub fn public() -> Result<Self, FeedError> {
        Self::new(DEFAULT_PROFILES_URL, DEFAULT_PAIRS_URL, DEFAULT_TIMEOUT)
    }
}

#[async_trait]
impl DiscoverySource for DexScreenerClient {
    async fn latest_profiles(&self) -> Result<Vec<Candidate>, FeedError> {
        let response = self.http.get(&self.profiles_url).send().await?;
        if !response.status().is_success() {
            return Err(FeedError::BadStatus(response.status().as_u16()));
        }

        let parsed: ProfilesResponse = response
            .json()
            .await
            .map_err(|e| FeedError::ParseError(e.to_string()))?;

        // Items missing either field are tolerated by dropping the item
        let candidates = parsed
            .into_profiles()
            .into_iter()
            .filter_map(|p| match (p.chain_id, p.token_address) {
                (Some(chain), Some(addr)) => Some(Candidate::new(chain, addr)),
                _ => None,
            })
            .collect();

        Ok(candidates)
    }
}

#[async_trait]
impl PairSource for DexScreenerClient {
    async fn token_pairs(
        &self,
        chain_id: &str,
        token_address: &str,
    ) -> Result<Vec<PairRecord>, FeedError> {
        let url = format!("{}/{}/{}", self.pairs_url, chain_id, token_address);
        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(FeedError::BadStatus(response.status().as_u16()));
        }

        let raw: serde_json::Value = response
            .json()
            .await
            .map_err(|e| FeedError::ParseError(e.to_string()))?;

        let Some(items) = raw.as_array() else {
            return Err(FeedError::UnexpectedShape);
        };

        // One malformed pair drops that pair, not the response
        let pairs = items
            .iter()
            .filter_map(|item| serde_json::from_value::<PairData>(item.clone()).ok())
            .map(|pair| pair.into_record(chain_id, token_address))
            .collect();

        Ok(pairs)
    }
}
