//! Log-only sink: writes the alert line through tracing. Useful on its own
//! for dry runs and always cheap to keep enabled next to webhook sinks.

use async_trait::async_trait;

use crate::ports::models::NotificationEvent;
use crate::ports::sinks::{NotificationSink, NotifyError};

#[derive(Debug, Default, Clone)]
pub struct LogSink;

impl LogSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationSink for LogSink {
    async fn deliver(&self, event: &NotificationEvent) -> Result<(), NotifyError> {
        tracing::info!(
            "New Token Alert -> {} ({}) | DEX: {} | Price: {} | FDV: {} | \
             MarketCap: {} | Liquidity: {} | Age: {}",
            event.token_name,
            event.token_address,
            event.dex_id,
            event.price_usd,
            event.fdv,
            event.market_cap,
            event.liquidity,
            event.age_text(),
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}
