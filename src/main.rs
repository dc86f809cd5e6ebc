//! Pairwatch - DexScreener New-Pair Watcher
//!
//! Alerts once per fresh token/pair that clears the configured liquidity,
//! valuation and freshness filters.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use pairwatch::adapters::dexscreener::DexScreenerClient;
use pairwatch::adapters::notify::{DiscordSink, LogSink};
use pairwatch::application::{WatcherOrchestrator, WatcherSettings};
use pairwatch::config::{load_config, Config};
use pairwatch::domain::filters::{FilterConfig, PairFilter};
use pairwatch::domain::seen_store::SeenStore;
use pairwatch::ports::sinks::NotificationSink;

/// Pairwatch - DexScreener new-pair alert watcher
#[derive(Parser, Debug)]
#[command(
    name = "pairwatch",
    version = env!("CARGO_PKG_VERSION"),
    about = "Watches DexScreener for fresh token pairs and alerts once per pair"
)]
struct CliApp {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Watch continuously on the configured interval
    Run(RunCmd),

    /// Run exactly one watch cycle and exit
    Scan(ScanCmd),

    /// Show the current seen-store contents
    Seen(SeenCmd),
}

#[derive(Parser, Debug)]
struct RunCmd {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/watcher.toml")]
    config: PathBuf,
}

#[derive(Parser, Debug)]
struct ScanCmd {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/watcher.toml")]
    config: PathBuf,
}

#[derive(Parser, Debug)]
struct SeenCmd {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/watcher.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Webhook URLs and other secrets can live in .env instead of the config
    dotenvy::dotenv().ok();

    let app = CliApp::parse();
    init_logging(app.verbose, app.debug);

    match app.command {
        Command::Run(cmd) => run_command(cmd).await,
        Command::Scan(cmd) => scan_command(cmd).await,
        Command::Seen(cmd) => seen_command(cmd).await,
    }
}

fn init_logging(verbose: bool, debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    fmt().with_env_filter(filter).init();
}

fn build_orchestrator(config: &Config) -> Result<WatcherOrchestrator> {
    let client = Arc::new(
        DexScreenerClient::new(
            config.dexscreener.profiles_url.clone(),
            config.dexscreener.pairs_url.clone(),
            Duration::from_secs(config.dexscreener.timeout_secs),
        )
        .context("Failed to create DexScreener client")?,
    );

    let mut sinks: Vec<Arc<dyn NotificationSink>> = Vec::new();
    if config.notifications.log_alerts {
        sinks.push(Arc::new(LogSink::new()));
    }
    let webhook_urls = config.notifications.webhook_urls();
    if !webhook_urls.is_empty() {
        sinks.push(Arc::new(
            DiscordSink::new(webhook_urls).context("Failed to create Discord sink")?,
        ));
    }

    let filter = PairFilter::new(FilterConfig::from(config));
    let settings = WatcherSettings::from(config);

    Ok(WatcherOrchestrator::new(
        Arc::clone(&client) as Arc<dyn pairwatch::ports::DiscoverySource>,
        client,
        sinks,
        filter,
        settings,
    ))
}

async fn run_command(cmd: RunCmd) -> Result<()> {
    let config = load_config(&cmd.config).context("Failed to load configuration")?;
    tracing::info!("Starting continuous token watcher...");

    let orchestrator = Arc::new(build_orchestrator(&config)?);

    let orch = Arc::clone(&orchestrator);
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        tracing::info!("Shutdown signal received");
        orch.stop().await;
    });

    orchestrator.run().await;
    tracing::info!("Pairwatch stopped");
    Ok(())
}

async fn scan_command(cmd: ScanCmd) -> Result<()> {
    let config = load_config(&cmd.config).context("Failed to load configuration")?;
    let orchestrator = build_orchestrator(&config)?;

    let report = orchestrator.cycle().await;
    println!(
        "Checked {} candidates, sent {} alert(s)",
        report.candidates, report.alerts
    );
    Ok(())
}

async fn seen_command(cmd: SeenCmd) -> Result<()> {
    let config = load_config(&cmd.config).context("Failed to load configuration")?;
    let store = SeenStore::load(
        config.store_path(),
        Duration::from_secs(config.store.max_age_secs),
    );

    println!("Seen store: {}", store.path().display());
    println!("Tracked entries: {}", store.len().await);
    for (chain, count) in store.chain_counts().await {
        println!("  {}: {}", chain, count);
    }
    Ok(())
}
