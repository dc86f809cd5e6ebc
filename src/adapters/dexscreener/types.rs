//! DexScreener wire models.
//!
//! Everything upstream is treated as untrusted and partial: each field is
//! optional and numeric fields tolerate wrong types by becoming `None`, so a
//! single odd pair never fails a whole response.

use serde::{Deserialize, Deserializer};

use crate::ports::models::PairRecord;

/// The profiles endpoint returns either a bare list or `{ "tokens": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ProfilesResponse {
    List(Vec<TokenProfile>),
    Wrapped { tokens: Vec<TokenProfile> },
}

impl ProfilesResponse {
    pub fn into_profiles(self) -> Vec<TokenProfile> {
        match self {
            ProfilesResponse::List(profiles) => profiles,
            ProfilesResponse::Wrapped { tokens } => tokens,
        }
    }
}

/// One item of the latest-token-profiles feed.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenProfile {
    #[serde(rename = "chainId")]
    pub chain_id: Option<String>,
    #[serde(rename = "tokenAddress")]
    pub token_address: Option<String>,
}

/// One pair object from the token-pairs endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PairData {
    #[serde(rename = "chainId")]
    pub chain_id: Option<String>,
    #[serde(rename = "dexId")]
    pub dex_id: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "pairAddress")]
    pub pair_address: Option<String>,
    #[serde(rename = "baseToken")]
    pub base_token: Option<TokenSide>,
    #[serde(rename = "quoteToken")]
    pub quote_token: Option<TokenSide>,
    #[serde(rename = "priceUsd", default, deserialize_with = "lenient_string")]
    pub price_usd: Option<String>,
    pub liquidity: Option<Liquidity>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub fdv: Option<f64>,
    #[serde(rename = "marketCap", default, deserialize_with = "lenient_f64")]
    pub market_cap: Option<f64>,
    #[serde(rename = "pairCreatedAt", default, deserialize_with = "lenient_i64")]
    pub pair_created_at: Option<i64>,
    pub info: Option<PairInfo>,
}

/// Base or quote side of a pair.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenSide {
    pub address: Option<String>,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Liquidity {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub usd: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PairInfo {
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
}

impl PairData {
    /// Normalize into the domain record, keyed to the requested candidate.
    ///
    /// `chain_id`/`token_address` come from the request so a pair missing
    /// those fields still dedups under the right identity.
    pub fn into_record(self, chain_id: &str, token_address: &str) -> PairRecord {
        let image_url = self
            .info
            .as_ref()
            .and_then(|i| i.image_url.clone())
            .or_else(|| self.base_token.as_ref().and_then(|b| b.icon.clone()));

        PairRecord {
            chain_id: self.chain_id.unwrap_or_else(|| chain_id.to_string()),
            token_address: token_address.to_string(),
            pair_address: self.pair_address,
            dex_id: self.dex_id,
            token_name: self.base_token.as_ref().and_then(|b| b.name.clone()),
            price_usd: self.price_usd,
            liquidity_usd: self.liquidity.and_then(|l| l.usd),
            fdv: self.fdv,
            market_cap_usd: self.market_cap,
            quote_address: self.quote_token.and_then(|q| q.address),
            pair_created_at_millis: self.pair_created_at,
            dex_url: self.url,
            image_url,
        }
    }
}

/// Accept a JSON number, map anything else (string, null, absent) to None.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_f64()))
}

/// Accept a JSON integer, map anything else to None.
fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_i64()))
}

/// Accept a JSON string or number, rendered as a string.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_bare_list() {
        let json = r#"[
            {"chainId": "solana", "tokenAddress": "0xA"},
            {"chainId": "ethereum"}
        ]"#;
        let parsed: ProfilesResponse = serde_json::from_str(json).unwrap();
        let profiles = parsed.into_profiles();
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].chain_id.as_deref(), Some("solana"));
        assert!(profiles[1].token_address.is_none());
    }

    #[test]
    fn test_profiles_wrapped_object() {
        let json = r#"{"tokens": [{"chainId": "solana", "tokenAddress": "0xA"}]}"#;
        let parsed: ProfilesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.into_profiles().len(), 1);
    }

    #[test]
    fn test_pair_full_shape() {
        let json = r#"{
            "chainId": "solana",
            "dexId": "raydium",
            "url": "https://dexscreener.com/solana/pair1",
            "pairAddress": "0xPAIR",
            "baseToken": {"address": "0xBASE", "name": "Test Token", "symbol": "TEST"},
            "quoteToken": {"address": "0xUSDC1", "name": "USD Coin", "symbol": "USDC"},
            "priceUsd": "0.002",
            "liquidity": {"usd": 45000.5},
            "fdv": 90000,
            "marketCap": 70000,
            "pairCreatedAt": 1700000000000,
            "info": {"imageUrl": "https://img.example/t.png"}
        }"#;
        let pair: PairData = serde_json::from_str(json).unwrap();
        let record = pair.into_record("solana", "0xBASE");

        assert_eq!(record.pair_address.as_deref(), Some("0xPAIR"));
        assert_eq!(record.liquidity_usd, Some(45000.5));
        assert_eq!(record.fdv, Some(90000.0));
        assert_eq!(record.market_cap_usd, Some(70000.0));
        assert_eq!(record.quote_address.as_deref(), Some("0xUSDC1"));
        assert_eq!(record.pair_created_at_millis, Some(1_700_000_000_000));
        assert_eq!(record.image_url.as_deref(), Some("https://img.example/t.png"));
    }

    #[test]
    fn test_pair_wrong_typed_numerics_become_none() {
        let json = r#"{
            "pairAddress": "0xPAIR",
            "liquidity": {"usd": "lots"},
            "fdv": "90000",
            "marketCap": null,
            "pairCreatedAt": "yesterday",
            "priceUsd": 0.002
        }"#;
        let pair: PairData = serde_json::from_str(json).unwrap();
        let record = pair.into_record("solana", "0xBASE");

        assert_eq!(record.liquidity_usd, None);
        assert_eq!(record.fdv, None);
        assert_eq!(record.market_cap_usd, None);
        assert_eq!(record.pair_created_at_millis, None);
        // Numeric price is still displayable
        assert_eq!(record.price_usd.as_deref(), Some("0.002"));
    }

    #[test]
    fn test_pair_empty_object_is_valid() {
        let pair: PairData = serde_json::from_str("{}").unwrap();
        let record = pair.into_record("solana", "0xBASE");

        assert_eq!(record.chain_id, "solana");
        assert_eq!(record.token_address, "0xBASE");
        assert!(record.pair_address.is_none());
        assert_eq!(record.display_name(), "Unknown");
        assert_eq!(record.display_dex(), "unknown");
    }

    #[test]
    fn test_image_falls_back_to_base_token_icon() {
        let json = r#"{
            "baseToken": {"address": "0xBASE", "name": "T", "icon": "https://img/icon.png"}
        }"#;
        let pair: PairData = serde_json::from_str(json).unwrap();
        let record = pair.into_record("solana", "0xBASE");
        assert_eq!(record.image_url.as_deref(), Some("https://img/icon.png"));
    }
}
