//! Seen-Token Store
//!
//! Durable, TTL-pruned record of every token/pair the watcher has already
//! alerted on. Backs the at-most-once notification guarantee: a key claimed
//! here is never alerted again, across concurrent workers and across process
//! restarts (as long as the store file survives).
//!
//! On-disk shape is a single JSON document grouped by chain:
//! `{ "solana": [ { "CA": ..., "dexId": ..., "firstSeenTs": ... }, ... ] }`

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;

/// Default retention window for seen entries (8 hours)
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(8 * 60 * 60);

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read seen file: {0}")]
    ReadError(String),
    #[error("Failed to write seen file: {0}")]
    WriteError(String),
    #[error("Failed to serialize seen entries: {0}")]
    SerializationError(String),
    #[error("Failed to create data directory: {0}")]
    DirectoryError(String),
}

/// Stable dedup identity for one alerted token/pair.
///
/// Prefers the pair address when present (stable across token renames and
/// re-indexing), falling back to the contract address. The DEX id is
/// deliberately not part of the key: the same token listed on several DEXes
/// alerts at most once.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeenKey {
    chain_id: String,
    kind: KeyKind,
    address: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum KeyKind {
    Pair,
    Ca,
}

impl SeenKey {
    /// Build a key from a chain, a token contract address and an optional
    /// pair address. Addresses are trimmed; a whitespace-only pair address
    /// counts as absent.
    pub fn new(chain_id: &str, token_address: &str, pair_address: Option<&str>) -> Self {
        let pair = pair_address.map(str::trim).filter(|p| !p.is_empty());
        match pair {
            Some(pair) => Self {
                chain_id: chain_id.to_string(),
                kind: KeyKind::Pair,
                address: pair.to_string(),
            },
            None => Self {
                chain_id: chain_id.to_string(),
                kind: KeyKind::Ca,
                address: token_address.trim().to_string(),
            },
        }
    }

    /// Rebuild the key a stored entry was claimed under.
    pub fn from_entry(chain_id: &str, entry: &SeenEntry) -> Self {
        Self::new(chain_id, &entry.ca, entry.pair_address.as_deref())
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }
}

/// One alerted token/pair as persisted on disk.
///
/// Field names match the historical file format so older store files keep
/// loading. Everything except `CA` and `firstSeenTs` is display-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeenEntry {
    #[serde(rename = "CA")]
    pub ca: String,
    #[serde(rename = "dexId")]
    pub dex_id: Option<String>,
    #[serde(rename = "tokenName")]
    pub token_name: Option<String>,
    #[serde(rename = "pairAddress")]
    pub pair_address: Option<String>,
    /// Claim time, epoch seconds. Entries without a well-formed integer
    /// timestamp are treated as corrupt and dropped at load.
    #[serde(rename = "firstSeenTs")]
    pub first_seen_ts: i64,
    /// Age of the pair when first alerted, e.g. "3 min (12 sec)"
    #[serde(rename = "ageAtFirstSeen")]
    pub age_at_first_seen: Option<String>,
}

/// In-memory state: the fast-membership key set plus the persistable
/// chain-grouped entries. The two are kept bijective - every key has exactly
/// one entry and vice versa.
#[derive(Debug, Default)]
struct Inner {
    keys: HashSet<SeenKey>,
    entries: HashMap<String, Vec<SeenEntry>>,
}

/// Durable dedup store, safe for concurrent read-then-write.
///
/// `add` is one atomic unit: check, insert, prune, persist - all under a
/// single lock, so racing workers on the same key degrade to no-ops after
/// the first writer.
#[derive(Debug)]
pub struct SeenStore {
    path: PathBuf,
    max_age: Duration,
    inner: Mutex<Inner>,
}

impl SeenStore {
    /// Load the store from `path`, pruning expired and malformed entries.
    ///
    /// A missing, unreadable or corrupt file degrades to an empty store with
    /// the failure logged - discovery proceeds rather than halting.
    pub fn load(path: impl Into<PathBuf>, max_age: Duration) -> Self {
        let path = path.into();
        let inner = match fs::read_to_string(&path) {
            Ok(content) => Self::parse_document(&content, max_age, now_ts()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No seen file at {}, starting empty", path.display());
                Inner::default()
            }
            Err(e) => {
                tracing::error!("Error reading seen file {}: {}", path.display(), e);
                Inner::default()
            }
        };

        Self {
            path,
            max_age,
            inner: Mutex::new(inner),
        }
    }

    /// Rebuild in-memory state from the raw document, dropping anything
    /// expired, malformed or duplicated.
    fn parse_document(content: &str, max_age: Duration, now: i64) -> Inner {
        let raw: serde_json::Value = match serde_json::from_str(content) {
            Ok(v) => v,
            Err(e) => {
                tracing::error!("Seen file is corrupt, starting empty: {}", e);
                return Inner::default();
            }
        };

        let mut inner = Inner::default();
        let Some(chains) = raw.as_object() else {
            tracing::warn!("Seen file is not an object, starting empty");
            return inner;
        };

        let cutoff = now - max_age.as_secs() as i64;
        for (chain_id, entries) in chains {
            let Some(entries) = entries.as_array() else {
                continue;
            };

            let mut kept = Vec::new();
            for value in entries {
                // A non-integer timestamp is corruption, not "never expires"
                let Some(entry) = Self::parse_entry(value) else {
                    continue;
                };
                if entry.first_seen_ts < cutoff {
                    continue;
                }

                let key = SeenKey::from_entry(chain_id, &entry);
                if !inner.keys.insert(key) {
                    continue; // same token/pair recorded twice
                }
                kept.push(entry);
            }

            if !kept.is_empty() {
                inner.entries.insert(chain_id.clone(), kept);
            }
        }

        inner
    }

    /// Parse one stored entry, returning None for anything malformed.
    fn parse_entry(value: &serde_json::Value) -> Option<SeenEntry> {
        let first_seen_ts = value.get("firstSeenTs")?.as_i64()?;
        let ca = value.get("CA")?.as_str()?.to_string();
        let get_str =
            |field: &str| value.get(field).and_then(|v| v.as_str()).map(String::from);

        Some(SeenEntry {
            ca,
            dex_id: get_str("dexId"),
            token_name: get_str("tokenName"),
            pair_address: get_str("pairAddress"),
            first_seen_ts,
            age_at_first_seen: get_str("ageAtFirstSeen"),
        })
    }

    /// O(1) membership test.
    pub async fn contains(&self, key: &SeenKey) -> bool {
        self.inner.lock().await.keys.contains(key)
    }

    /// Claim `key` and persist. Returns true if this caller won the claim,
    /// false if the key was already present (no-op, nothing written).
    ///
    /// The whole check-insert-prune-save sequence holds the store lock, so
    /// concurrent adds for the same key cannot double-append. A failed write
    /// is logged and leaves the in-memory claim in place - worst case the
    /// next process misses it and re-alerts, never a duplicate within this
    /// process.
    pub async fn add(&self, key: SeenKey, entry: SeenEntry) -> bool {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;

        if !inner.keys.insert(key.clone()) {
            return false; // first notifier already won
        }

        let chain_id = key.chain_id().to_string();
        let bucket = inner.entries.entry(chain_id.clone()).or_default();
        bucket.push(entry);

        // Prune this chain's bucket of anything that has aged out, keeping
        // the key set in step with the surviving entries
        let cutoff = now_ts() - self.max_age.as_secs() as i64;
        let (kept, expired): (Vec<SeenEntry>, Vec<SeenEntry>) = bucket
            .drain(..)
            .partition(|e| e.first_seen_ts >= cutoff);
        *bucket = kept;
        for old in &expired {
            inner.keys.remove(&SeenKey::from_entry(&chain_id, old));
        }

        if let Err(e) = Self::write_document(&self.path, &inner.entries) {
            tracing::error!("Could not save seen file: {}", e);
        }

        true
    }

    /// Persist the full current mapping, overwriting prior content.
    pub async fn save(&self) -> Result<(), StoreError> {
        let inner = self.inner.lock().await;
        Self::write_document(&self.path, &inner.entries)
    }

    fn write_document(
        path: &Path,
        entries: &HashMap<String, Vec<SeenEntry>>,
    ) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| StoreError::DirectoryError(e.to_string()))?;
            }
        }

        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| StoreError::SerializationError(e.to_string()))?;
        fs::write(path, content).map_err(|e| StoreError::WriteError(e.to_string()))?;

        tracing::debug!(
            "Saved {} chains of seen entries to {}",
            entries.len(),
            path.display()
        );
        Ok(())
    }

    /// Entry counts per chain, sorted by chain id. For status output.
    pub async fn chain_counts(&self) -> Vec<(String, usize)> {
        let inner = self.inner.lock().await;
        let mut counts: Vec<(String, usize)> = inner
            .entries
            .iter()
            .map(|(chain, entries)| (chain.clone(), entries.len()))
            .collect();
        counts.sort();
        counts
    }

    /// Number of claimed keys currently held.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.keys.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.keys.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Current time, epoch seconds.
pub fn now_ts() -> i64 {
    chrono::Utc::now().timestamp()
}
