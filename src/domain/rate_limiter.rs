//! Endpoint Rate Limiter
//!
//! Enforces a minimum interval between calls to one logical API endpoint,
//! shared by any number of concurrent workers. Callers queue on an internal
//! mutex that is held across the wait, so completions come out strictly
//! spaced - no burst allowance, no token bucket.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Minimum-interval throttle for one endpoint.
///
/// Each endpoint gets its own instance; the discovery feed and the per-token
/// pair feed must never share one.
#[derive(Debug)]
pub struct RateLimiter {
    /// Minimum spacing between call completions
    min_interval: Duration,
    /// Completion time of the most recent acquire
    last_call: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Create a limiter allowing `rate_per_sec` calls per second.
    ///
    /// Rates are validated at config load; a non-positive rate here falls
    /// back to one call per second rather than panicking.
    pub fn new(rate_per_sec: f64) -> Self {
        let rate = if rate_per_sec > 0.0 { rate_per_sec } else { 1.0 };
        Self {
            min_interval: Duration::from_secs_f64(1.0 / rate),
            last_call: Mutex::new(None),
        }
    }

    /// Block until at least `1/rate` has elapsed since the previous caller's
    /// acquire completed. FIFO: the mutex is held across the sleep, so
    /// waiters cannot interleave and violate the spacing.
    pub async fn acquire(&self) {
        let mut last = self.last_call.lock().await;
        if let Some(prev) = *last {
            let ready_at = prev + self.min_interval;
            let now = Instant::now();
            if ready_at > now {
                tokio::time::sleep_until(ready_at).await;
            }
        }
        *last = Some(Instant::now());
    }

    /// The configured minimum spacing.
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}
