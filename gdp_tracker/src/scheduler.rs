//! Polling scheduler: fetch, perturb, record, and publish on a fixed cadence.
//!
//! ## What this does
//! - Owns the Idle/Running lifecycle around one background poll task.
//! - Per cycle, walks the tracked countries **in order**: fetch the baseline
//!   (any failure is logged and substituted with 0.0, never fatal), perturb
//!   it, stamp it with a second-truncated UTC timestamp, append it to the
//!   rolling history under the mutex.
//! - After the whole cycle, takes one snapshot, publishes it to the
//!   [`SnapshotCell`], and invokes the render callback with it.
//!
//! ## Single-flight
//! One `tokio::time::interval` drives the loop and the cycle future is
//! awaited inside the `select!`, so a new cycle can never start while the
//! previous one is in flight. Ticks missed by a slow cycle fire back-to-back
//! afterwards (tokio's default Burst behavior); no tick is skipped or
//! coalesced.
//!
//! ## Stop guarantees
//! [`GdpPoller::stop`] flips a watch channel and then **awaits the task**.
//! The biased `select!` prefers cancellation, an in-flight cycle finishes
//! (its callback included) before the task exits, and no callback runs
//! after `stop` returns. Each `start` gets a fresh channel and task, so a
//! stop can never race the start that follows it.

use std::sync::Arc;
use std::time::Duration;

use chrono::{SubsecRound, Utc};
use thiserror::Error;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;

use indicator_ingestor::models::country::Country;
use indicator_ingestor::providers::IndicatorProvider;

use crate::history::{GdpSample, HistorySnapshot, RollingHistory};
use crate::jitter::Jitter;
use crate::latest::SnapshotCell;

/// Default poll cadence.
pub const DEFAULT_CADENCE: Duration = Duration::from_secs(2);

/// Callback invoked with the freshly published snapshot after every cycle.
///
/// Runs on the poll task, so it must stay cheap; renderers that do real
/// work should push the snapshot onto a channel and draw elsewhere.
pub type RenderCallback = Arc<dyn Fn(Arc<HistorySnapshot>) + Send + Sync>;

/// Errors from [`GdpPoller::start`].
#[derive(Debug, Error)]
pub enum StartError {
    /// The tracked set is empty; there is nothing to poll.
    #[error("no countries selected; nothing to poll")]
    NoSelection,

    /// The poller is already Running; stop it before starting again.
    #[error("the poller is already running")]
    AlreadyRunning,
}

struct PollWorker {
    cancel_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Interval-driven poller over a tracked set of countries.
pub struct GdpPoller {
    provider: Arc<dyn IndicatorProvider>,
    history: Arc<Mutex<RollingHistory>>,
    jitter: Arc<Mutex<Jitter>>,
    cadence: Duration,
    on_render: RenderCallback,
    latest: SnapshotCell,
    worker: Option<PollWorker>,
}

impl GdpPoller {
    /// A poller in the Idle state.
    ///
    /// `history` is shared with whatever reconciles selection (the same
    /// mutex serializes every buffer mutation); `jitter` is owned from here
    /// on, so seed it first for reproducible runs.
    pub fn new(
        provider: Arc<dyn IndicatorProvider>,
        history: Arc<Mutex<RollingHistory>>,
        jitter: Jitter,
        cadence: Duration,
        on_render: RenderCallback,
    ) -> Self {
        Self {
            provider,
            history,
            jitter: Arc::new(Mutex::new(jitter)),
            cadence,
            on_render,
            latest: SnapshotCell::new(),
            worker: None,
        }
    }

    /// Whether the poller is Running.
    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// The configured cadence.
    pub fn cadence(&self) -> Duration {
        self.cadence
    }

    /// The most recently published snapshot (empty before the first cycle).
    pub fn latest(&self) -> Arc<HistorySnapshot> {
        self.latest.load()
    }

    /// A clone of the snapshot cell, for readers that outlive this borrow.
    pub fn snapshot_cell(&self) -> SnapshotCell {
        self.latest.clone()
    }

    /// Leave Idle: spawn the poll task over a private copy of `tracked`.
    ///
    /// The first cycle runs immediately, subsequent ones every
    /// [`cadence`](Self::cadence). Must be called within a tokio runtime.
    ///
    /// Errors:
    /// - [`StartError::AlreadyRunning`] when not Idle.
    /// - [`StartError::NoSelection`] when `tracked` is empty.
    pub fn start(&mut self, tracked: &[Country]) -> Result<(), StartError> {
        if self.worker.is_some() {
            return Err(StartError::AlreadyRunning);
        }
        if tracked.is_empty() {
            return Err(StartError::NoSelection);
        }

        let (cancel_tx, mut cancel_rx) = watch::channel(false);
        let provider = Arc::clone(&self.provider);
        let history = Arc::clone(&self.history);
        let jitter = Arc::clone(&self.jitter);
        let latest = self.latest.clone();
        let on_render = Arc::clone(&self.on_render);
        let cadence = self.cadence;
        let tracked = tracked.to_vec();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(cadence);
            loop {
                tokio::select! {
                    biased;
                    _ = cancel_rx.changed() => break,
                    _ = ticker.tick() => {
                        run_cycle(&provider, &history, &jitter, &tracked, &latest, &on_render).await;
                    }
                }
            }
            tracing::debug!("poll task exiting after cancellation");
        });

        self.worker = Some(PollWorker { cancel_tx, handle });
        Ok(())
    }

    /// Return to Idle. No-op when already Idle.
    ///
    /// Waits for the poll task to exit, so once this returns no render
    /// callback will fire again until the next `start`.
    pub async fn stop(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.cancel_tx.send(true);
            let _ = worker.handle.await;
        }
    }
}

/// One poll cycle over the tracked countries, ending in a publish.
async fn run_cycle(
    provider: &Arc<dyn IndicatorProvider>,
    history: &Mutex<RollingHistory>,
    jitter: &Mutex<Jitter>,
    tracked: &[Country],
    latest: &SnapshotCell,
    on_render: &RenderCallback,
) {
    for country in tracked {
        let baseline = match provider.latest_value(&country.code).await {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(
                    "baseline fetch for {} failed, substituting 0.0: {err}",
                    country.name
                );
                0.0
            }
        };

        let value = jitter.lock().await.apply(baseline);
        let sample = GdpSample {
            timestamp: Utc::now().trunc_subsecs(0),
            value,
        };
        history.lock().await.record(&country.name, sample);
    }

    let snapshot = Arc::new(history.lock().await.snapshot());
    latest.store(Arc::clone(&snapshot));
    (on_render)(snapshot);
}
