//! Command-line runner: poll, perturb, and print the tracked countries.

use std::num::NonZeroUsize;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::Mutex;
use tracing_subscriber::EnvFilter;

use gdp_tracker::config::{TrackerConfig, load_config_path, normalize_config};
use gdp_tracker::history::RollingHistory;
use gdp_tracker::jitter::Jitter;
use gdp_tracker::scheduler::{GdpPoller, RenderCallback};
use gdp_tracker::selection::SelectionManager;

#[derive(Parser)]
#[command(version, about = "GDP Tracker CLI")]
struct Cli {
    /// Countries to poll, by display name (e.g. "India" "United States").
    #[arg(required_unless_present = "list")]
    countries: Vec<String>,

    /// Tracker TOML file; every knob has a default when omitted.
    #[arg(long, value_name = "FILE")]
    config: Option<String>,

    /// Override the poll cadence in seconds.
    #[arg(long)]
    interval_secs: Option<u64>,

    /// Override the per-country history capacity.
    #[arg(long)]
    capacity: Option<NonZeroUsize>,

    /// Seed the jitter RNG for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many rendered cycles instead of waiting for Ctrl-C.
    #[arg(long)]
    cycles: Option<u64>,

    /// Print the configured country table and exit.
    #[arg(long)]
    list: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // 1) Config file (or defaults), then CLI overrides, re-normalized so an
    //    override can't smuggle in a zero interval.
    let mut cfg = match &cli.config {
        Some(path) => load_config_path(path)?,
        None => TrackerConfig::default(),
    };
    if let Some(secs) = cli.interval_secs {
        cfg.poll_interval_secs = secs;
    }
    if let Some(capacity) = cli.capacity {
        cfg.capacity = capacity;
    }
    normalize_config(&mut cfg)?;

    let registry = cfg.registry();
    if cli.list {
        for country in registry.iter() {
            println!("{}  {}", country.code, country.name);
        }
        return Ok(());
    }

    // 2) Wire the engine
    let history = Arc::new(Mutex::new(RollingHistory::new(cfg.capacity)));
    let mut selection = SelectionManager::new(registry, Arc::clone(&history));
    let outcome = selection.select(&cli.countries).await;
    for name in &outcome.rejected {
        tracing::warn!("unknown country skipped: {name}");
    }

    let provider = cfg.source.provider().context("build World Bank provider")?;
    let jitter = match cli.seed {
        Some(seed) => Jitter::seeded(cfg.jitter_amplitude, seed),
        None => Jitter::new(cfg.jitter_amplitude),
    };

    let (cycle_tx, mut cycle_rx) = tokio::sync::mpsc::unbounded_channel();
    let on_render: RenderCallback = Arc::new(move |snapshot| {
        for (name, samples) in &snapshot.series {
            match samples.last() {
                Some(s) => {
                    println!("{name}: {:.2} at {}", s.value, s.timestamp.format("%H:%M:%S"))
                }
                None => println!("{name}: (no data yet)"),
            }
        }
        println!("---");
        let _ = cycle_tx.send(());
    });

    let mut poller = GdpPoller::new(
        Arc::new(provider),
        history,
        jitter,
        cfg.poll_interval(),
        on_render,
    );
    poller.start(selection.tracked())?;
    tracing::info!(
        "polling {} countries every {:?}",
        selection.tracked().len(),
        poller.cadence()
    );

    // 3) Run until the cycle budget is spent or Ctrl-C arrives.
    match cli.cycles {
        Some(budget) => {
            let mut seen = 0u64;
            while seen < budget && cycle_rx.recv().await.is_some() {
                seen += 1;
            }
        }
        None => {
            tokio::signal::ctrl_c().await.context("listen for ctrl-c")?;
            tracing::info!("shutdown signal received");
        }
    }

    poller.stop().await;
    Ok(())
}
