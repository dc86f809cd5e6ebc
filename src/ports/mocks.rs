//! Hand-rolled port mocks that record calls and serve controlled responses.
//! Used by the evaluator/orchestrator unit tests and the integration suite.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::models::{Candidate, NotificationEvent, PairRecord};
use super::sinks::{NotificationSink, NotifyError};
use super::sources::{DiscoverySource, FeedError, PairSource};

/// Mock discovery feed serving a fixed candidate batch (or a failure).
#[derive(Debug, Default)]
pub struct MockDiscovery {
    candidates: Vec<Candidate>,
    fail: bool,
    calls: Arc<Mutex<u32>>,
}

impl MockDiscovery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_candidates(mut self, candidates: Vec<Candidate>) -> Self {
        self.candidates = candidates;
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn call_count(&self) -> u32 {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl DiscoverySource for MockDiscovery {
    async fn latest_profiles(&self) -> Result<Vec<Candidate>, FeedError> {
        *self.calls.lock().unwrap() += 1;
        if self.fail {
            return Err(FeedError::HttpError("mock discovery down".to_string()));
        }
        Ok(self.candidates.clone())
    }
}

/// Mock pair feed keyed by token address.
#[derive(Debug, Default)]
pub struct MockPairs {
    pairs_by_token: HashMap<String, Vec<PairRecord>>,
    failing_tokens: Vec<String>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockPairs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pairs(mut self, token_address: &str, pairs: Vec<PairRecord>) -> Self {
        self.pairs_by_token.insert(token_address.to_string(), pairs);
        self
    }

    /// Make the feed fail for one token address.
    pub fn with_failure(mut self, token_address: &str) -> Self {
        self.failing_tokens.push(token_address.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PairSource for MockPairs {
    async fn token_pairs(
        &self,
        _chain_id: &str,
        token_address: &str,
    ) -> Result<Vec<PairRecord>, FeedError> {
        self.calls.lock().unwrap().push(token_address.to_string());
        if self.failing_tokens.iter().any(|t| t == token_address) {
            return Err(FeedError::BadStatus(500));
        }
        Ok(self
            .pairs_by_token
            .get(token_address)
            .cloned()
            .unwrap_or_default())
    }
}

/// Mock sink recording every delivered event; optionally always failing.
#[derive(Debug, Default)]
pub struct MockSink {
    delivered: Arc<Mutex<Vec<NotificationEvent>>>,
    fail: bool,
}

impl MockSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            delivered: Arc::default(),
            fail: true,
        }
    }

    pub fn delivered(&self) -> Vec<NotificationEvent> {
        self.delivered.lock().unwrap().clone()
    }

    /// Shared handle to the delivery log, for sinks moved into an
    /// orchestrator.
    pub fn delivered_handle(&self) -> Arc<Mutex<Vec<NotificationEvent>>> {
        Arc::clone(&self.delivered)
    }
}

#[async_trait]
impl NotificationSink for MockSink {
    async fn deliver(&self, event: &NotificationEvent) -> Result<(), NotifyError> {
        self.delivered.lock().unwrap().push(event.clone());
        if self.fail {
            return Err(NotifyError::DeliveryFailed("mock sink down".to_string()));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "mock"
    }
}
