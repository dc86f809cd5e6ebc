//! Shared data models crossing the port boundaries.

use serde::{Deserialize, Serialize};

use crate::domain::seen_store::SeenKey;

/// A freshly discovered token to evaluate. Ephemeral, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub chain_id: String,
    pub token_address: String,
}

impl Candidate {
    pub fn new(chain_id: impl Into<String>, token_address: impl Into<String>) -> Self {
        Self {
            chain_id: chain_id.into(),
            token_address: token_address.into(),
        }
    }
}

/// One trading pair as reported by the pair feed, normalized for filtering.
///
/// All upstream fields are optional - a missing field fails the relevant
/// filter rather than the whole response.
#[derive(Debug, Clone, Default)]
pub struct PairRecord {
    pub chain_id: String,
    pub token_address: String,
    pub pair_address: Option<String>,
    pub dex_id: Option<String>,
    pub token_name: Option<String>,
    /// Display-only price string, carried verbatim from upstream
    pub price_usd: Option<String>,
    pub liquidity_usd: Option<f64>,
    pub fdv: Option<f64>,
    pub market_cap_usd: Option<f64>,
    pub quote_address: Option<String>,
    pub pair_created_at_millis: Option<i64>,
    pub dex_url: Option<String>,
    pub image_url: Option<String>,
}

impl PairRecord {
    /// The dedup identity this pair resolves to (pair address preferred).
    pub fn seen_key(&self) -> SeenKey {
        SeenKey::new(
            &self.chain_id,
            &self.token_address,
            self.pair_address.as_deref(),
        )
    }

    pub fn display_name(&self) -> &str {
        self.token_name.as_deref().unwrap_or("Unknown")
    }

    pub fn display_dex(&self) -> &str {
        self.dex_id.as_deref().unwrap_or("unknown")
    }

    /// The pair's DexScreener page, falling back to the token page.
    pub fn display_url(&self) -> String {
        self.dex_url.clone().unwrap_or_else(|| {
            format!(
                "https://dexscreener.com/{}/{}",
                self.chain_id, self.token_address
            )
        })
    }
}

/// Fully-formed alert handed to every notification sink.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationEvent {
    pub token_address: String,
    pub token_name: String,
    pub dex_id: String,
    pub url: String,
    pub fdv: f64,
    pub market_cap: f64,
    /// Upstream price string, "N/A" when the feed omitted it
    pub price_usd: String,
    pub liquidity: f64,
    pub image_url: Option<String>,
    pub age_minutes: Option<i64>,
    pub age_seconds: Option<i64>,
}

impl NotificationEvent {
    /// Human age text: "3 min 12 sec", "45 sec", or empty when unknown.
    pub fn age_text(&self) -> String {
        match (self.age_minutes, self.age_seconds) {
            (Some(min), Some(sec)) if min > 0 => format!("{} min {} sec", min, sec),
            (Some(_), Some(sec)) => format!("{} sec", sec),
            _ => String::new(),
        }
    }
}
