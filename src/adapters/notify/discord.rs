//! Discord webhook sink.
//!
//! Posts one embed per alert to every configured webhook URL. A failing URL
//! is logged and skipped; it never blocks delivery to the others and never
//! touches the dedup store (the key is claimed before delivery starts).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::ports::models::NotificationEvent;
use crate::ports::sinks::{NotificationSink, NotifyError};

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);
const EMBED_COLOR: u32 = 5_814_783;

#[derive(Debug, Clone)]
pub struct DiscordSink {
    http: Client,
    webhook_urls: Vec<String>,
}

impl DiscordSink {
    pub fn new(webhook_urls: Vec<String>) -> Result<Self, NotifyError> {
        let http = Client::builder()
            .timeout(WEBHOOK_TIMEOUT)
            .build()
            .map_err(|e| NotifyError::DeliveryFailed(e.to_string()))?;
        Ok(Self { http, webhook_urls })
    }

    pub fn is_configured(&self) -> bool {
        !self.webhook_urls.is_empty()
    }

    fn build_payload(event: &NotificationEvent) -> serde_json::Value {
        let age_text = event.age_text();
        let age_line = if age_text.is_empty() {
            String::new()
        } else {
            format!("**Age:** {}\n", age_text)
        };

        let description = format!(
            "**CA:** `{}`\n\
             **DEX:** {}\n\
             **Price:** ${}\n\
             **Liquidity:** ${}\n\
             **Market Cap:** ${}\n\
             **FDV:** ${}\n\
             {}",
            event.token_address,
            event.dex_id.to_uppercase(),
            event.price_usd,
            event.liquidity,
            event.market_cap,
            event.fdv,
            age_line,
        );

        let thumbnail = event
            .image_url
            .as_ref()
            .map(|url| serde_json::json!({ "url": url }))
            .unwrap_or(serde_json::Value::Null);

        serde_json::json!({
            "embeds": [{
                "title": event.token_name,
                "url": event.url,
                "description": description,
                "thumbnail": thumbnail,
                "color": EMBED_COLOR,
            }]
        })
    }
}

#[async_trait]
impl NotificationSink for DiscordSink {
    async fn deliver(&self, event: &NotificationEvent) -> Result<(), NotifyError> {
        if self.webhook_urls.is_empty() {
            return Ok(());
        }

        let payload = Self::build_payload(event);
        let mut failures = 0usize;

        for url in &self.webhook_urls {
            match self.http.post(url).json(&payload).send().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    // Discord answers 204 on success, 200 with ?wait=true
                    if status != 200 && status != 204 {
                        let body = response.text().await.unwrap_or_default();
                        tracing::error!("Discord error [{}]: {} {}", url, status, body);
                        failures += 1;
                    }
                }
                Err(e) => {
                    tracing::error!("Error sending to Discord [{}]: {}", url, e);
                    failures += 1;
                }
            }
        }

        if failures == self.webhook_urls.len() {
            return Err(NotifyError::DeliveryFailed(format!(
                "all {} webhook(s) failed",
                failures
            )));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "discord"
    }
}
