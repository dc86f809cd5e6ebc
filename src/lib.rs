//! Pairwatch - DexScreener New-Pair Watcher Library
//!
//! Continuously discovers newly listed tokens, filters their trading pairs
//! against liquidity/valuation/freshness thresholds, and alerts exactly once
//! per distinct token/pair.
//!
//! # Modules
//!
//! - `domain`: Core logic (SeenStore, RateLimiter, PairFilter)
//! - `ports`: Trait abstractions (DiscoverySource, PairSource, NotificationSink)
//! - `adapters`: External implementations (DexScreener, Discord, log)
//! - `application`: Discovery, Evaluator and the watch cycle
//! - `config`: Configuration loading and validation

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
