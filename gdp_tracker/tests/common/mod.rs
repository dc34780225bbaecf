#![allow(dead_code)]

use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::sync::mpsc::UnboundedReceiver;

use gdp_tracker::history::{HistorySnapshot, RollingHistory};
use gdp_tracker::jitter::Jitter;
use gdp_tracker::scheduler::{GdpPoller, RenderCallback};
use gdp_tracker::selection::SelectionManager;
use indicator_ingestor::providers::{IndicatorProvider, ProviderError};
use indicator_ingestor::registry::CountryRegistry;

/// Provider that answers from a fixed baseline table, optionally failing
/// for chosen codes, and counts every call it receives.
pub struct ScriptedProvider {
    baselines: Vec<(String, f64)>,
    failing: HashSet<String>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(baselines: &[(&str, f64)]) -> Self {
        Self {
            baselines: baselines
                .iter()
                .map(|(code, value)| (code.to_string(), *value))
                .collect(),
            failing: HashSet::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Make every fetch for `code` fail with an API error.
    pub fn failing_for(mut self, code: &str) -> Self {
        self.failing.insert(code.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IndicatorProvider for ScriptedProvider {
    async fn latest_value(&self, country_code: &str) -> Result<f64, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.failing.contains(country_code) {
            return Err(ProviderError::Api(format!(
                "scripted failure for {country_code}"
            )));
        }
        self.baselines
            .iter()
            .find(|(code, _)| code == country_code)
            .map(|(_, value)| *value)
            .ok_or_else(|| ProviderError::Empty(format!("no observations for {country_code}")))
    }
}

/// A fully wired engine plus the channel its render callback publishes on.
pub struct TestTracker {
    pub poller: GdpPoller,
    pub selection: SelectionManager,
    pub history: Arc<Mutex<RollingHistory>>,
    pub snapshots: UnboundedReceiver<Arc<HistorySnapshot>>,
}

impl TestTracker {
    /// Await `n` more render callbacks, returning the last snapshot.
    pub async fn recv_cycles(&mut self, n: usize) -> Arc<HistorySnapshot> {
        let mut last = None;
        for _ in 0..n {
            last = Some(self.snapshots.recv().await.expect("render channel open"));
        }
        last.expect("n must be > 0")
    }

    /// Count the snapshots already sitting in the channel. Called after
    /// `stop` this picks up the cycles that completed between the last
    /// `recv` and the task joining.
    pub fn drain(&mut self) -> usize {
        let mut n = 0;
        while self.snapshots.try_recv().is_ok() {
            n += 1;
        }
        n
    }
}

pub fn cap(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).expect("capacity")
}

/// Engine against the builtin registry, a seeded jitter, and a channel
/// render callback.
pub fn setup_tracker(
    provider: Arc<dyn IndicatorProvider>,
    capacity: NonZeroUsize,
    cadence: Duration,
) -> TestTracker {
    let history = Arc::new(Mutex::new(RollingHistory::new(capacity)));

    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    let on_render: RenderCallback = Arc::new(move |snapshot| {
        let _ = tx.send(snapshot);
    });

    let selection = SelectionManager::new(CountryRegistry::builtin(), Arc::clone(&history));
    let poller = GdpPoller::new(
        provider,
        Arc::clone(&history),
        Jitter::seeded(0.01, 9),
        cadence,
        on_render,
    );

    TestTracker {
        poller,
        selection,
        history,
        snapshots: rx,
    }
}
