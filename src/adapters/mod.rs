//! Adapters Layer - External implementations of the ports
//!
//! - `dexscreener`: HTTP client for the discovery and pair feeds
//! - `notify`: Discord webhook and log sinks

pub mod dexscreener;
pub mod notify;
