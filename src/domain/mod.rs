//! Domain Layer - Core watcher logic
//!
//! - `seen_store`: durable TTL-pruned dedup of already-alerted tokens/pairs
//! - `rate_limiter`: per-endpoint minimum-interval throttle
//! - `filters`: threshold and freshness checks for candidate pairs

pub mod filters;
pub mod rate_limiter;
pub mod seen_store;

pub use filters::{AgeBreakdown, FilterConfig, PairFilter, Rejection};
pub use rate_limiter::RateLimiter;
pub use seen_store::{SeenEntry, SeenKey, SeenStore, StoreError, DEFAULT_MAX_AGE};
