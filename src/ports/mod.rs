//! Ports Layer - Trait definitions for external dependencies
//!
//! Interfaces the adapters implement:
//! - Discovery feed (latest token profiles)
//! - Pair feed (trading pairs for one token)
//! - Notification sinks (Discord webhook, log, ...)

pub mod mocks;
pub mod models;
pub mod sinks;
pub mod sources;

pub use models::{Candidate, NotificationEvent, PairRecord};
pub use sinks::{NotificationSink, NotifyError};
pub use sources::{DiscoverySource, FeedError, PairSource};
