//! Tracked-set management: which countries the poller polls.
//!
//! [`SelectionManager::select`] is the only way membership changes. It
//! resolves requested names through the registry, partitions them into
//! accepted and rejected, and reconciles the rolling history in the same
//! step so dropped countries lose their series immediately.
//!
//! While the poller is Running the tracked set must not change underneath
//! it; the supported sequence is stop, select, start. The poller task works
//! from a private clone of the tracked list, so a caller that follows that
//! sequence can never expose a half-updated set to an in-flight cycle.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Mutex;

use indicator_ingestor::models::country::Country;
use indicator_ingestor::registry::CountryRegistry;

use crate::history::RollingHistory;

/// Result of one [`SelectionManager::select`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionOutcome {
    /// The new tracked set, in input order, deduplicated.
    pub tracked: Vec<Country>,

    /// Raw inputs that resolved to nothing, in input order.
    pub rejected: Vec<String>,
}

/// Owns the current tracked set and reconciles history on every change.
pub struct SelectionManager {
    registry: CountryRegistry,
    tracked: Vec<Country>,
    history: Arc<Mutex<RollingHistory>>,
}

impl SelectionManager {
    /// Manager with an empty tracked set.
    pub fn new(registry: CountryRegistry, history: Arc<Mutex<RollingHistory>>) -> Self {
        Self {
            registry,
            tracked: Vec::new(),
            history,
        }
    }

    /// Replace the tracked set with the resolvable subset of `names`.
    ///
    /// Each name goes through [`CountryRegistry::resolve`]; resolvable ones
    /// become the new tracked set (input order, duplicates collapsed onto
    /// their first occurrence) and the rest come back in
    /// [`SelectionOutcome::rejected`] verbatim. The history is reconciled
    /// in the same call: survivors keep their samples, newcomers start
    /// empty, dropped countries are cleared.
    ///
    /// An empty or fully-unresolvable input leaves an empty tracked set and
    /// clears all prior history. That state is "no selection", which
    /// [`crate::scheduler::GdpPoller::start`] turns into an error rather
    /// than polling nothing forever.
    pub async fn select<I, S>(&mut self, names: I) -> SelectionOutcome
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tracked: Vec<Country> = Vec::new();
        let mut rejected: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for raw in names {
            let raw = raw.as_ref();
            match self.registry.resolve(raw) {
                Ok(country) => {
                    if seen.insert(country.name.clone()) {
                        tracked.push(country.clone());
                    }
                }
                Err(_) => rejected.push(raw.to_string()),
            }
        }

        self.history.lock().await.apply_selection(&tracked);
        self.tracked = tracked.clone();

        SelectionOutcome { tracked, rejected }
    }

    /// The current tracked set, in selection order.
    pub fn tracked(&self) -> &[Country] {
        &self.tracked
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.tracked.is_empty()
    }

    /// The registry selections resolve against.
    pub fn registry(&self) -> &CountryRegistry {
        &self.registry
    }
}
