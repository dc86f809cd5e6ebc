//! Token Watcher Integration Tests
//!
//! Integration tests that verify the watcher components work together:
//! 1. Discovery -> Evaluator -> SeenStore -> sink pipeline
//! 2. At-most-once guarantees under concurrency and across restarts
//! 3. Store retention and corruption handling against real files
//!
//! All tests are deterministic (no real network calls) and use the port
//! mocks plus tempfile-backed stores.

use std::sync::Arc;
use std::time::Duration;

use pairwatch::application::{WatcherOrchestrator, WatcherSettings};
use pairwatch::domain::seen_store::now_ts;
use pairwatch::domain::{FilterConfig, PairFilter, SeenEntry, SeenKey, SeenStore};
use pairwatch::ports::mocks::{MockDiscovery, MockPairs, MockSink};
use pairwatch::ports::models::{Candidate, PairRecord};

// ============================================================================
// Test Fixtures
// ============================================================================

/// A pair that clears every default filter with room to spare.
fn passing_pair(token: &str, pair_addr: &str) -> PairRecord {
    PairRecord {
        chain_id: "solana".to_string(),
        token_address: token.to_string(),
        pair_address: Some(pair_addr.to_string()),
        dex_id: Some("raydium".to_string()),
        token_name: Some("Integration Token".to_string()),
        price_usd: Some("0.0042".to_string()),
        liquidity_usd: Some(55_000.0),
        fdv: Some(120_000.0),
        market_cap_usd: Some(80_000.0),
        quote_address: Some("USDCmint111".to_string()),
        pair_created_at_millis: Some(chrono::Utc::now().timestamp_millis() - 90_000),
        dex_url: None,
        image_url: None,
    }
}

fn filter() -> PairFilter {
    PairFilter::new(FilterConfig {
        quote_allowlist: vec!["USDCmint111".to_string()],
        max_pair_age: Duration::from_secs(3600),
        ..FilterConfig::default()
    })
}

fn settings(store_path: std::path::PathBuf) -> WatcherSettings {
    WatcherSettings {
        store_path,
        profiles_rate_per_sec: 1000.0,
        pairs_rate_per_sec: 1000.0,
        ..WatcherSettings::default()
    }
}

fn entry(ca: &str, pair: Option<&str>, first_seen_ts: i64) -> SeenEntry {
    SeenEntry {
        ca: ca.to_string(),
        dex_id: Some("raydium".to_string()),
        token_name: Some("Integration Token".to_string()),
        pair_address: pair.map(String::from),
        first_seen_ts,
        age_at_first_seen: Some("1 min (30 sec)".to_string()),
    }
}

// ============================================================================
// Full-pipeline tests
// ============================================================================

#[tokio::test]
async fn test_full_pipeline_alerts_once_per_token() {
    let dir = tempfile::tempdir().unwrap();
    let discovery = Arc::new(MockDiscovery::new().with_candidates(vec![
        Candidate::new("solana", "TokA"),
        Candidate::new("solana", "TokB"),
        Candidate::new("solana", "TokA"), // duplicate candidate in one batch
    ]));
    let pairs = Arc::new(
        MockPairs::new()
            .with_pairs("TokA", vec![passing_pair("TokA", "PairA")])
            .with_pairs("TokB", vec![passing_pair("TokB", "PairB")]),
    );
    let sink = Arc::new(MockSink::new());

    let orchestrator = WatcherOrchestrator::new(
        discovery,
        pairs,
        vec![sink.clone()],
        filter(),
        settings(dir.path().join("seen.json")),
    );

    let report = orchestrator.cycle().await;
    assert_eq!(report.candidates, 3);
    // The duplicate candidate lost the store claim: two distinct alerts
    assert_eq!(report.alerts, 2);

    let mut delivered: Vec<String> = sink
        .delivered()
        .into_iter()
        .map(|e| e.token_address)
        .collect();
    delivered.sort();
    assert_eq!(delivered, vec!["TokA".to_string(), "TokB".to_string()]);
}

#[tokio::test]
async fn test_restart_does_not_realert() {
    let dir = tempfile::tempdir().unwrap();
    let store_path = dir.path().join("seen.json");
    let candidates = vec![Candidate::new("solana", "TokA")];
    let sink = Arc::new(MockSink::new());

    {
        let orchestrator = WatcherOrchestrator::new(
            Arc::new(MockDiscovery::new().with_candidates(candidates.clone())),
            Arc::new(MockPairs::new().with_pairs("TokA", vec![passing_pair("TokA", "PairA")])),
            vec![sink.clone()],
            filter(),
            settings(store_path.clone()),
        );
        assert_eq!(orchestrator.cycle().await.alerts, 1);
    }

    // Fresh orchestrator, same store file: simulates a process restart
    let orchestrator = WatcherOrchestrator::new(
        Arc::new(MockDiscovery::new().with_candidates(candidates)),
        Arc::new(MockPairs::new().with_pairs("TokA", vec![passing_pair("TokA", "PairA")])),
        vec![sink.clone()],
        filter(),
        settings(store_path),
    );
    assert_eq!(orchestrator.cycle().await.alerts, 0);
    assert_eq!(sink.delivered().len(), 1);
}

#[tokio::test]
async fn test_disallowed_quote_never_reaches_sinks() {
    let dir = tempfile::tempdir().unwrap();
    let mut wrong_quote = passing_pair("TokA", "PairA");
    wrong_quote.quote_address = Some("WSOLmint111".to_string());

    let sink = Arc::new(MockSink::new());
    let orchestrator = WatcherOrchestrator::new(
        Arc::new(MockDiscovery::new().with_candidates(vec![Candidate::new("solana", "TokA")])),
        Arc::new(MockPairs::new().with_pairs("TokA", vec![wrong_quote])),
        vec![sink.clone()],
        filter(),
        settings(dir.path().join("seen.json")),
    );

    let report = orchestrator.cycle().await;
    assert_eq!(report.alerts, 0);
    assert!(sink.delivered().is_empty());
    // Rejected pairs are not claimed: a later cycle may still alert it
    let store = SeenStore::load(dir.path().join("seen.json"), Duration::from_secs(28_800));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_same_token_on_two_dexes_alerts_once() {
    let dir = tempfile::tempdir().unwrap();
    // Same pair address reported by two DEX listings
    let mut orca_listing = passing_pair("TokA", "PairA");
    orca_listing.dex_id = Some("orca".to_string());

    let sink = Arc::new(MockSink::new());
    let orchestrator = WatcherOrchestrator::new(
        Arc::new(MockDiscovery::new().with_candidates(vec![Candidate::new("solana", "TokA")])),
        Arc::new(
            MockPairs::new()
                .with_pairs("TokA", vec![passing_pair("TokA", "PairA"), orca_listing]),
        ),
        vec![sink.clone()],
        filter(),
        settings(dir.path().join("seen.json")),
    );

    assert_eq!(orchestrator.cycle().await.alerts, 1);
    assert_eq!(sink.delivered().len(), 1);
}

// ============================================================================
// Store guarantees
// ============================================================================

#[tokio::test]
async fn test_concurrent_claims_have_one_winner() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(SeenStore::load(
        dir.path().join("seen.json"),
        Duration::from_secs(28_800),
    ));

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..16 {
        let store = Arc::clone(&store);
        tasks.spawn(async move {
            let key = SeenKey::new("solana", "TokA", Some("PairA"));
            store.add(key, entry("TokA", Some("PairA"), now_ts())).await
        });
    }

    let mut winners = 0;
    while let Some(result) = tasks.join_next().await {
        if result.unwrap() {
            winners += 1;
        }
    }

    assert_eq!(winners, 1);
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_retention_window_on_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("seen.json");
    let now = now_ts();

    {
        let store = SeenStore::load(&path, Duration::from_secs(28_800));
        // 20000s old: inside the 28800s window. 30000s old: expired.
        store
            .add(
                SeenKey::new("solana", "Fresh", Some("PairFresh")),
                entry("Fresh", Some("PairFresh"), now - 20_000),
            )
            .await;
        store
            .add(
                SeenKey::new("solana", "Stale", Some("PairStale")),
                entry("Stale", Some("PairStale"), now - 30_000),
            )
            .await;
    }

    let reloaded = SeenStore::load(&path, Duration::from_secs(28_800));
    assert!(
        reloaded
            .contains(&SeenKey::new("solana", "Fresh", Some("PairFresh")))
            .await
    );
    assert!(
        !reloaded
            .contains(&SeenKey::new("solana", "Stale", Some("PairStale")))
            .await
    );
    assert_eq!(reloaded.len().await, 1);
}

#[tokio::test]
async fn test_legacy_file_format_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("seen.json");

    // Hand-written document in the historical field naming
    let document = serde_json::json!({
        "solana": [
            {
                "CA": "TokA",
                "dexId": "raydium",
                "tokenName": "Legacy Token",
                "pairAddress": "PairA",
                "firstSeenTs": now_ts(),
                "ageAtFirstSeen": "2 min (15 sec)"
            }
        ]
    });
    std::fs::write(&path, serde_json::to_string_pretty(&document).unwrap()).unwrap();

    let store = SeenStore::load(&path, Duration::from_secs(28_800));
    assert!(store.contains(&SeenKey::new("solana", "TokA", Some("PairA"))).await);

    // Re-save and reload: the format is preserved
    store
        .add(
            SeenKey::new("solana", "TokB", None),
            entry("TokB", None, now_ts()),
        )
        .await;
    let reloaded = SeenStore::load(&path, Duration::from_secs(28_800));
    assert_eq!(reloaded.len().await, 2);
    assert!(reloaded.contains(&SeenKey::new("solana", "TokB", None)).await);
}

#[tokio::test]
async fn test_corrupt_store_file_does_not_block_alerts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("seen.json");
    std::fs::write(&path, "{ definitely not json").unwrap();

    let sink = Arc::new(MockSink::new());
    let orchestrator = WatcherOrchestrator::new(
        Arc::new(MockDiscovery::new().with_candidates(vec![Candidate::new("solana", "TokA")])),
        Arc::new(MockPairs::new().with_pairs("TokA", vec![passing_pair("TokA", "PairA")])),
        vec![sink.clone()],
        filter(),
        settings(path.clone()),
    );

    // Corrupt file degrades to an empty store; the cycle alerts and rewrites it
    assert_eq!(orchestrator.cycle().await.alerts, 1);
    assert_eq!(orchestrator.cycle().await.alerts, 0);
}
