//! Watcher Orchestrator
//!
//! Owns one full watch cycle: load the seen store, discover candidates, fan
//! them out across a bounded worker pool into the evaluator, forward every
//! event to every sink, save the store. The `run` loop repeats the cycle on
//! a fixed interval until stopped; a cycle always completes - worker and
//! upstream failures are logged, never propagated.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{RwLock, Semaphore};
use tokio::task::JoinSet;

use crate::application::discovery::Discovery;
use crate::application::evaluator::Evaluator;
use crate::domain::filters::PairFilter;
use crate::domain::rate_limiter::RateLimiter;
use crate::domain::seen_store::SeenStore;
use crate::ports::sinks::NotificationSink;
use crate::ports::sources::{DiscoverySource, PairSource};

/// Runtime settings for the watcher, usually sourced from config.
#[derive(Debug, Clone)]
pub struct WatcherSettings {
    /// Chain the watcher follows (e.g. "solana")
    pub chain_id: String,
    /// Concurrent evaluator workers per cycle
    pub worker_count: usize,
    /// Pause between cycles in the `run` loop
    pub cycle_interval: Duration,
    /// Seen-store file location
    pub store_path: PathBuf,
    /// Seen-store retention window
    pub store_max_age: Duration,
    /// Discovery endpoint rate (calls per second)
    pub profiles_rate_per_sec: f64,
    /// Pair endpoint rate (calls per second)
    pub pairs_rate_per_sec: f64,
}

impl Default for WatcherSettings {
    fn default() -> Self {
        Self {
            chain_id: "solana".to_string(),
            worker_count: 5,
            cycle_interval: Duration::from_secs(60),
            store_path: PathBuf::from("data/seen_tokens.json"),
            store_max_age: crate::domain::seen_store::DEFAULT_MAX_AGE,
            profiles_rate_per_sec: 1.0,
            pairs_rate_per_sec: 5.0,
        }
    }
}

/// What one cycle did, for logs and the `scan` command.
#[derive(Debug, Clone, Copy, Default)]
pub struct CycleReport {
    pub candidates: usize,
    pub alerts: usize,
}

pub struct WatcherOrchestrator {
    discovery_source: Arc<dyn DiscoverySource>,
    pair_source: Arc<dyn PairSource>,
    sinks: Vec<Arc<dyn NotificationSink>>,
    filter: PairFilter,
    /// One limiter per endpoint, shared across cycles and workers
    profiles_limiter: Arc<RateLimiter>,
    pairs_limiter: Arc<RateLimiter>,
    settings: WatcherSettings,
    is_running: Arc<RwLock<bool>>,
}

impl WatcherOrchestrator {
    pub fn new(
        discovery_source: Arc<dyn DiscoverySource>,
        pair_source: Arc<dyn PairSource>,
        sinks: Vec<Arc<dyn NotificationSink>>,
        filter: PairFilter,
        settings: WatcherSettings,
    ) -> Self {
        let profiles_limiter = Arc::new(RateLimiter::new(settings.profiles_rate_per_sec));
        let pairs_limiter = Arc::new(RateLimiter::new(settings.pairs_rate_per_sec));

        Self {
            discovery_source,
            pair_source,
            sinks,
            filter,
            profiles_limiter,
            pairs_limiter,
            settings,
            is_running: Arc::new(RwLock::new(false)),
        }
    }

    /// Run cycles on the configured interval until `stop` is called.
    pub async fn run(&self) {
        *self.is_running.write().await = true;
        tracing::info!(
            "Starting token watcher - chain: {}, workers: {}, interval: {:?}",
            self.settings.chain_id,
            self.settings.worker_count,
            self.settings.cycle_interval
        );

        while *self.is_running.read().await {
            let report = self.cycle().await;
            tracing::info!(
                "Cycle done: {} candidates, {} alerts. Sleeping {:?}...",
                report.candidates,
                report.alerts,
                self.settings.cycle_interval
            );
            tokio::time::sleep(self.settings.cycle_interval).await;
        }

        tracing::info!("Token watcher stopped");
    }

    /// Stop starting new cycles. The in-flight cycle runs to completion.
    pub async fn stop(&self) {
        *self.is_running.write().await = false;
        tracing::info!("Stop signal sent to watcher");
    }

    /// Execute one full watch cycle.
    pub async fn cycle(&self) -> CycleReport {
        let store = Arc::new(SeenStore::load(
            &self.settings.store_path,
            self.settings.store_max_age,
        ));
        tracing::info!(
            "Loaded {} previously alerted entries (<= {:?})",
            store.len().await,
            self.settings.store_max_age
        );

        let discovery = Discovery::new(
            Arc::clone(&self.discovery_source),
            Arc::clone(&self.profiles_limiter),
            self.settings.chain_id.clone(),
        );
        let candidates = discovery.fetch().await;
        tracing::info!(
            "Fetched {} {} tokens. Checking pairs...",
            candidates.len(),
            self.settings.chain_id
        );

        let evaluator = Arc::new(Evaluator::new(
            Arc::clone(&self.pair_source),
            Arc::clone(&self.pairs_limiter),
            Arc::clone(&store),
            self.filter.clone(),
        ));

        // Bounded fan-out: every candidate gets a task, the semaphore keeps
        // at most worker_count of them evaluating at once
        let semaphore = Arc::new(Semaphore::new(self.settings.worker_count.max(1)));
        let mut workers = JoinSet::new();
        let candidate_count = candidates.len();

        for candidate in candidates {
            let evaluator = Arc::clone(&evaluator);
            let semaphore = Arc::clone(&semaphore);
            workers.spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return None, // semaphore closed, cycle is over
                };
                evaluator.evaluate(&candidate).await
            });
        }

        let mut events = Vec::new();
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(Some(event)) => events.push(event),
                Ok(None) => {}
                // One worker's panic never aborts its siblings
                Err(e) => tracing::error!("Worker task failed: {}", e),
            }
        }

        for event in &events {
            for sink in &self.sinks {
                if let Err(e) = sink.deliver(event).await {
                    tracing::error!(
                        "{} delivery failed for {}: {}",
                        sink.name(),
                        event.token_address,
                        e
                    );
                }
            }
        }

        // Adds already persisted themselves; this catches the pruning done
        // during load so the file never carries expired entries forward
        if let Err(e) = store.save().await {
            tracing::error!("Could not save seen store: {}", e);
        }

        CycleReport {
            candidates: candidate_count,
            alerts: events.len(),
        }
    }

    pub async fn is_running(&self) -> bool {
        *self.is_running.read().await
    }
}
