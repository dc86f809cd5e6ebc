//! Candidate Evaluator
//!
//! Runs one candidate through the pair feed and the filter pipeline. The
//! first pair that clears every check claims its dedup key and becomes the
//! notification; remaining pairs for that candidate are not scanned.

use std::sync::Arc;

use crate::domain::filters::PairFilter;
use crate::domain::rate_limiter::RateLimiter;
use crate::domain::seen_store::{now_ts, SeenEntry, SeenStore};
use crate::ports::models::{Candidate, NotificationEvent, PairRecord};
use crate::ports::sources::PairSource;

pub struct Evaluator {
    pairs: Arc<dyn PairSource>,
    limiter: Arc<RateLimiter>,
    store: Arc<SeenStore>,
    filter: PairFilter,
}

impl Evaluator {
    pub fn new(
        pairs: Arc<dyn PairSource>,
        limiter: Arc<RateLimiter>,
        store: Arc<SeenStore>,
        filter: PairFilter,
    ) -> Self {
        Self {
            pairs,
            limiter,
            store,
            filter,
        }
    }

    /// Evaluate one candidate. `None` is the normal "nothing new" outcome -
    /// fetch failures are logged, filter rejections are silent.
    pub async fn evaluate(&self, candidate: &Candidate) -> Option<NotificationEvent> {
        self.limiter.acquire().await;

        let pairs = match self
            .pairs
            .token_pairs(&candidate.chain_id, &candidate.token_address)
            .await
        {
            Ok(pairs) => pairs,
            Err(e) => {
                tracing::error!("{}: error fetching pairs: {}", candidate.token_address, e);
                return None;
            }
        };

        let now_ms = chrono::Utc::now().timestamp_millis();

        for pair in pairs {
            let key = pair.seen_key();
            if self.store.contains(&key).await {
                continue; // alerted in this cycle or a prior one
            }

            let age = match self.filter.check(&pair, now_ms) {
                Ok(age) => age,
                Err(rejection) => {
                    tracing::debug!(
                        "{} pair {:?} rejected: {:?}",
                        candidate.token_address,
                        pair.pair_address,
                        rejection
                    );
                    continue;
                }
            };

            let entry = SeenEntry {
                ca: candidate.token_address.trim().to_string(),
                dex_id: pair.dex_id.clone(),
                token_name: Some(pair.display_name().to_string()),
                pair_address: pair.pair_address.clone(),
                first_seen_ts: now_ts(),
                age_at_first_seen: Some(format!("{} min ({} sec)", age.minutes, age.seconds)),
            };

            // Claim before notifying; a racing worker that lost the claim
            // walks away without an event
            if !self.store.add(key, entry).await {
                continue;
            }

            let event = Self::build_event(&pair, age.minutes, age.seconds);
            tracing::info!(
                "New Token Alert -> {} ({}) | DEX: {} | Liquidity: {}",
                event.token_name,
                event.token_address,
                event.dex_id,
                event.liquidity,
            );
            return Some(event);
        }

        None
    }

    fn build_event(pair: &PairRecord, age_minutes: i64, age_seconds: i64) -> NotificationEvent {
        NotificationEvent {
            token_address: pair.token_address.clone(),
            token_name: pair.display_name().to_string(),
            dex_id: pair.display_dex().to_string(),
            url: pair.display_url(),
            fdv: pair.fdv.unwrap_or(0.0),
            market_cap: pair.market_cap_usd.unwrap_or(0.0),
            price_usd: pair
                .price_usd
                .clone()
                .unwrap_or_else(|| "N/A".to_string()),
            liquidity: pair.liquidity_usd.unwrap_or(0.0),
            image_url: pair.image_url.clone(),
            age_minutes: Some(age_minutes),
            age_seconds: Some(age_seconds),
        }
    }
}
