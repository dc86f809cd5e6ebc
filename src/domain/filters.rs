//! Pair Filter Pipeline
//!
//! Threshold and freshness checks applied to each candidate pair, in a fixed
//! order. A missing or wrong-typed upstream field is an ordinary rejection,
//! never an error - untrusted feed data fails the check it belongs to.

use std::time::Duration;

use crate::ports::models::PairRecord;

/// Filter thresholds, usually sourced from the `[filters]` config section.
#[derive(Debug, Clone)]
pub struct FilterConfig {
    /// Liquidity (USD) must exceed this to pass
    pub min_liquidity_usd: f64,
    /// Fully-diluted valuation (USD) must exceed this to pass
    pub min_fdv_usd: f64,
    /// Market capitalization (USD) must exceed this to pass
    pub min_market_cap_usd: f64,
    /// Pairs created longer ago than this are no longer "new"
    pub max_pair_age: Duration,
    /// Accepted quote-token addresses; a pair quoted in anything else is out
    pub quote_allowlist: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_liquidity_usd: 20_000.0,
            min_fdv_usd: 20_000.0,
            min_market_cap_usd: 20_000.0,
            max_pair_age: Duration::from_secs(365 * 24 * 60 * 60),
            quote_allowlist: Vec::new(),
        }
    }
}

/// Why a pair failed the pipeline. Ordered like the checks themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    LowLiquidity,
    LowFdv,
    LowMarketCap,
    QuoteNotAllowed,
    MissingCreatedAt,
    TooOld,
}

/// Age of an accepted pair, broken into whole minutes plus leftover seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeBreakdown {
    pub minutes: i64,
    pub seconds: i64,
}

impl AgeBreakdown {
    /// Split a millisecond age into whole minutes and remainder seconds.
    pub fn from_millis(age_ms: i64) -> Self {
        let total_seconds = age_ms.max(0) / 1000;
        Self {
            minutes: total_seconds / 60,
            seconds: total_seconds % 60,
        }
    }
}

/// The ordered filter pipeline of the evaluator.
#[derive(Debug, Clone)]
pub struct PairFilter {
    config: FilterConfig,
}

impl PairFilter {
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Run every check against `pair` at wall time `now_ms` (epoch millis).
    ///
    /// Returns the pair's age breakdown on acceptance, or the first failing
    /// check. Threshold comparisons are strict: a value exactly at the floor
    /// is rejected.
    pub fn check(&self, pair: &PairRecord, now_ms: i64) -> Result<AgeBreakdown, Rejection> {
        match pair.liquidity_usd {
            Some(liq) if liq > self.config.min_liquidity_usd => {}
            _ => return Err(Rejection::LowLiquidity),
        }

        match pair.fdv {
            Some(fdv) if fdv > self.config.min_fdv_usd => {}
            _ => return Err(Rejection::LowFdv),
        }

        match pair.market_cap_usd {
            Some(cap) if cap > self.config.min_market_cap_usd => {}
            _ => return Err(Rejection::LowMarketCap),
        }

        let quote_ok = pair
            .quote_address
            .as_deref()
            .map(|addr| self.config.quote_allowlist.iter().any(|a| a == addr))
            .unwrap_or(false);
        if !quote_ok {
            return Err(Rejection::QuoteNotAllowed);
        }

        let Some(created_at) = pair.pair_created_at_millis else {
            return Err(Rejection::MissingCreatedAt);
        };

        let age_ms = now_ms - created_at;
        if age_ms > self.config.max_pair_age.as_millis() as i64 {
            return Err(Rejection::TooOld);
        }

        Ok(AgeBreakdown::from_millis(age_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passing_pair(now_ms: i64) -> PairRecord {
        PairRecord {
            chain_id: "solana".to_string(),
            token_address: "0xTOKEN".to_string(),
            pair_address: Some("0xPAIR".to_string()),
            dex_id: Some("raydium".to_string()),
            token_name: Some("Test".to_string()),
            price_usd: Some("0.002".to_string()),
            liquidity_usd: Some(50_000.0),
            fdv: Some(80_000.0),
            market_cap_usd: Some(60_000.0),
            quote_address: Some("0xUSDC1".to_string()),
            pair_created_at_millis: Some(now_ms - 192_000), // 3 min 12 sec old
            dex_url: None,
            image_url: None,
        }
    }

    fn filter() -> PairFilter {
        PairFilter::new(FilterConfig {
            min_liquidity_usd: 20_000.0,
            min_fdv_usd: 20_000.0,
            min_market_cap_usd: 20_000.0,
            max_pair_age: Duration::from_secs(3600),
            quote_allowlist: vec!["0xUSDC1".to_string(), "0xUSDC2".to_string()],
        })
    }

    #[test]
    fn test_passing_pair_accepted_with_age() {
        let now_ms = 1_700_000_000_000;
        let age = filter().check(&passing_pair(now_ms), now_ms).unwrap();
        assert_eq!(age.minutes, 3);
        assert_eq!(age.seconds, 12);
    }

    #[test]
    fn test_liquidity_boundary_is_strict() {
        let now_ms = 1_700_000_000_000;
        let mut pair = passing_pair(now_ms);

        // Exactly at the floor: rejected
        pair.liquidity_usd = Some(20_000.0);
        assert_eq!(
            filter().check(&pair, now_ms),
            Err(Rejection::LowLiquidity)
        );

        // One unit above: accepted
        pair.liquidity_usd = Some(20_001.0);
        assert!(filter().check(&pair, now_ms).is_ok());
    }

    #[test]
    fn test_missing_numeric_fields_rejected() {
        let now_ms = 1_700_000_000_000;

        let mut pair = passing_pair(now_ms);
        pair.liquidity_usd = None;
        assert_eq!(filter().check(&pair, now_ms), Err(Rejection::LowLiquidity));

        let mut pair = passing_pair(now_ms);
        pair.fdv = None;
        assert_eq!(filter().check(&pair, now_ms), Err(Rejection::LowFdv));

        let mut pair = passing_pair(now_ms);
        pair.market_cap_usd = None;
        assert_eq!(filter().check(&pair, now_ms), Err(Rejection::LowMarketCap));
    }

    #[test]
    fn test_quote_allowlist_membership() {
        let now_ms = 1_700_000_000_000;

        let mut pair = passing_pair(now_ms);
        pair.quote_address = Some("0xUSDC2".to_string());
        assert!(filter().check(&pair, now_ms).is_ok());

        // Not on the allowlist: rejected even with every threshold cleared
        pair.quote_address = Some("0xWSOL".to_string());
        assert_eq!(
            filter().check(&pair, now_ms),
            Err(Rejection::QuoteNotAllowed)
        );

        pair.quote_address = None;
        assert_eq!(
            filter().check(&pair, now_ms),
            Err(Rejection::QuoteNotAllowed)
        );
    }

    #[test]
    fn test_empty_allowlist_rejects_everything() {
        let now_ms = 1_700_000_000_000;
        let filter = PairFilter::new(FilterConfig::default());
        assert_eq!(
            filter.check(&passing_pair(now_ms), now_ms),
            Err(Rejection::QuoteNotAllowed)
        );
    }

    #[test]
    fn test_freshness_window() {
        let now_ms = 1_700_000_000_000;

        let mut pair = passing_pair(now_ms);
        pair.pair_created_at_millis = None;
        assert_eq!(
            filter().check(&pair, now_ms),
            Err(Rejection::MissingCreatedAt)
        );

        // Over the 1h window
        pair.pair_created_at_millis = Some(now_ms - 3_600_001);
        assert_eq!(filter().check(&pair, now_ms), Err(Rejection::TooOld));

        // Just inside
        pair.pair_created_at_millis = Some(now_ms - 3_599_000);
        assert!(filter().check(&pair, now_ms).is_ok());
    }

    #[test]
    fn test_age_breakdown() {
        assert_eq!(
            AgeBreakdown::from_millis(192_500),
            AgeBreakdown {
                minutes: 3,
                seconds: 12
            }
        );
        assert_eq!(
            AgeBreakdown::from_millis(45_000),
            AgeBreakdown {
                minutes: 0,
                seconds: 45
            }
        );
        // Clock skew can make a pair look newer than now
        assert_eq!(
            AgeBreakdown::from_millis(-5_000),
            AgeBreakdown {
                minutes: 0,
                seconds: 0
            }
        );
    }
}
