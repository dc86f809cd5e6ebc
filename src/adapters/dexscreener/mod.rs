//! DexScreener Adapter
//!
//! HTTP client for the two upstream endpoints:
//! - token-profiles (latest listings, discovery)
//! - token-pairs (trading pairs for one token)

pub mod client;
pub mod types;

pub use client::DexScreenerClient;
