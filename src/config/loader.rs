//! Configuration Loader
//!
//! Loads and validates watcher configuration from TOML files.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Main configuration structure matching config.toml
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub watcher: WatcherSection,
    pub filters: FiltersSection,
    #[serde(default)]
    pub dexscreener: DexScreenerSection,
    #[serde(default)]
    pub store: StoreSection,
    #[serde(default)]
    pub notifications: NotificationsSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

/// Watcher configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct WatcherSection {
    /// Chain identifier to watch (e.g. "solana")
    pub chain_id: String,
    /// Concurrent pair-check workers per cycle
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,
    /// Seconds between cycles in continuous mode
    #[serde(default = "default_cycle_interval")]
    pub cycle_interval_secs: u64,
}

/// Filter thresholds section
#[derive(Debug, Clone, Deserialize)]
pub struct FiltersSection {
    /// Minimum liquidity in USD (must be exceeded)
    pub min_liquidity_usd: f64,
    /// Minimum fully-diluted valuation in USD
    pub min_fdv_usd: f64,
    /// Minimum market capitalization in USD
    pub min_market_cap_usd: f64,
    /// Maximum pair age in seconds to still count as "new"
    #[serde(default = "default_max_pair_age")]
    pub max_pair_age_secs: u64,
    /// Accepted quote-token addresses
    #[serde(default)]
    pub quote_allowlist: Vec<String>,
}

/// DexScreener API section
#[derive(Debug, Clone, Deserialize)]
pub struct DexScreenerSection {
    pub profiles_url: String,
    pub pairs_url: String,
    /// Discovery endpoint rate (calls per second)
    pub profiles_rate_per_sec: f64,
    /// Pair endpoint rate (calls per second)
    pub pairs_rate_per_sec: f64,
    /// HTTP timeout in seconds
    pub timeout_secs: u64,
}

impl Default for DexScreenerSection {
    fn default() -> Self {
        Self {
            profiles_url: crate::adapters::dexscreener::client::DEFAULT_PROFILES_URL.to_string(),
            pairs_url: crate::adapters::dexscreener::client::DEFAULT_PAIRS_URL.to_string(),
            profiles_rate_per_sec: 1.0,
            pairs_rate_per_sec: 5.0,
            timeout_secs: 10,
        }
    }
}

/// Seen-store section
#[derive(Debug, Clone, Deserialize)]
pub struct StoreSection {
    /// Store file path (supports ~)
    pub path: String,
    /// Retention window in seconds
    pub max_age_secs: u64,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            path: "data/seen_tokens.json".to_string(),
            max_age_secs: 8 * 60 * 60,
        }
    }
}

/// Notifications section
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationsSection {
    /// Discord webhook URLs; empty disables Discord
    #[serde(default)]
    pub discord_webhook_urls: Vec<String>,
    /// Also emit each alert as a log line
    #[serde(default = "default_log_alerts")]
    pub log_alerts: bool,
}

impl Default for NotificationsSection {
    fn default() -> Self {
        Self {
            discord_webhook_urls: Vec::new(),
            log_alerts: default_log_alerts(),
        }
    }
}

impl NotificationsSection {
    /// Webhook URLs with environment override.
    /// `PAIRWATCH_DISCORD_WEBHOOKS` (comma-separated) wins over the config.
    pub fn webhook_urls(&self) -> Vec<String> {
        match std::env::var("PAIRWATCH_DISCORD_WEBHOOKS") {
            Ok(value) if !value.trim().is_empty() => value
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            _ => self.discord_webhook_urls.clone(),
        }
    }
}

/// Logging section
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSection {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

fn default_worker_count() -> usize {
    5
}

fn default_cycle_interval() -> u64 {
    60
}

fn default_max_pair_age() -> u64 {
    365 * 24 * 60 * 60
}

fn default_log_alerts() -> bool {
    true
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.watcher.chain_id.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "chain_id cannot be empty".to_string(),
            ));
        }

        if self.watcher.worker_count == 0 {
            return Err(ConfigError::ValidationError(
                "worker_count must be > 0".to_string(),
            ));
        }

        if self.filters.min_liquidity_usd < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "min_liquidity_usd must be >= 0, got {}",
                self.filters.min_liquidity_usd
            )));
        }

        if self.filters.min_fdv_usd < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "min_fdv_usd must be >= 0, got {}",
                self.filters.min_fdv_usd
            )));
        }

        if self.filters.min_market_cap_usd < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "min_market_cap_usd must be >= 0, got {}",
                self.filters.min_market_cap_usd
            )));
        }

        if self.dexscreener.profiles_url.is_empty() || self.dexscreener.pairs_url.is_empty() {
            return Err(ConfigError::ValidationError(
                "dexscreener URLs cannot be empty".to_string(),
            ));
        }

        if self.dexscreener.profiles_rate_per_sec <= 0.0
            || self.dexscreener.pairs_rate_per_sec <= 0.0
        {
            return Err(ConfigError::ValidationError(
                "endpoint rates must be > 0".to_string(),
            ));
        }

        if self.dexscreener.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "timeout_secs must be > 0".to_string(),
            ));
        }

        if self.store.max_age_secs == 0 {
            return Err(ConfigError::ValidationError(
                "max_age_secs must be > 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Store path with ~ expanded.
    pub fn store_path(&self) -> String {
        shellexpand::tilde(&self.store.path).to_string()
    }
}

impl From<&Config> for crate::domain::filters::FilterConfig {
    fn from(config: &Config) -> Self {
        Self {
            min_liquidity_usd: config.filters.min_liquidity_usd,
            min_fdv_usd: config.filters.min_fdv_usd,
            min_market_cap_usd: config.filters.min_market_cap_usd,
            max_pair_age: Duration::from_secs(config.filters.max_pair_age_secs),
            quote_allowlist: config.filters.quote_allowlist.clone(),
        }
    }
}

impl From<&Config> for crate::application::orchestrator::WatcherSettings {
    fn from(config: &Config) -> Self {
        Self {
            chain_id: config.watcher.chain_id.clone(),
            worker_count: config.watcher.worker_count,
            cycle_interval: Duration::from_secs(config.watcher.cycle_interval_secs),
            store_path: config.store_path().into(),
            store_max_age: Duration::from_secs(config.store.max_age_secs),
            profiles_rate_per_sec: config.dexscreener.profiles_rate_per_sec,
            pairs_rate_per_sec: config.dexscreener.pairs_rate_per_sec,
        }
    }
}
