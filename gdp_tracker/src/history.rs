//! Rolling per-country sample history and its immutable snapshots.
//!
//! Key behaviors:
//! - One bounded FIFO of [`GdpSample`]s per tracked country, keyed by
//!   display name in the order countries were first tracked (the map is an
//!   [`IndexMap`], which is what makes snapshot order deterministic).
//! - Appending to a full series evicts exactly one sample, the oldest,
//!   so the series length never exceeds the cap (push, then trim).
//! - [`RollingHistory::snapshot`] deep-copies into a [`HistorySnapshot`];
//!   later mutation never shows through an already-taken snapshot.
//!
//! Membership is reconciled through [`RollingHistory::apply_selection`];
//! `reset`/`reset_all` only empty series, they never untrack a country.

use std::collections::VecDeque;
use std::num::NonZeroUsize;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use indicator_ingestor::models::country::Country;

/// Default number of samples retained per country.
pub const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(20) {
    Some(n) => n,
    None => unreachable!(),
};

/// A single observed (well, fabricated) value at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GdpSample {
    /// When the sample was taken (UTC, truncated to whole seconds by the
    /// producer).
    pub timestamp: DateTime<Utc>,

    /// The perturbed indicator value.
    pub value: f64,
}

/// Bounded FIFO history for every tracked country.
#[derive(Debug)]
pub struct RollingHistory {
    capacity: NonZeroUsize,
    series: IndexMap<String, VecDeque<GdpSample>>,
}

impl RollingHistory {
    /// Empty history retaining at most `capacity` samples per country.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            capacity,
            series: IndexMap::new(),
        }
    }

    /// Maximum samples retained per country.
    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }

    /// Number of tracked countries (including ones with empty series).
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Whether no country is tracked at all.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Append a sample to `name`'s series, creating the series on first
    /// use. When the series is already at capacity the oldest sample is
    /// evicted, so the length never exceeds `capacity`.
    pub fn record(&mut self, name: &str, sample: GdpSample) {
        let series = self.series.entry(name.to_string()).or_default();
        series.push_back(sample);
        if series.len() > self.capacity.get() {
            series.pop_front();
        }
    }

    /// Clear one country's samples. The country stays tracked (its key
    /// remains, with an empty series). Returns whether the series existed.
    pub fn reset(&mut self, name: &str) -> bool {
        match self.series.get_mut(name) {
            Some(series) => {
                series.clear();
                true
            }
            None => false,
        }
    }

    /// Clear every country's samples, keeping the tracked set itself.
    pub fn reset_all(&mut self) {
        for series in self.series.values_mut() {
            series.clear();
        }
    }

    /// Reconcile the tracked set: rebuild the map in `tracked` order,
    /// moving surviving series over, starting newcomers empty, and
    /// dropping everything else. After this, snapshot order equals the
    /// order of `tracked`.
    pub fn apply_selection(&mut self, tracked: &[Country]) {
        let mut rebuilt = IndexMap::with_capacity(tracked.len());
        for country in tracked {
            if rebuilt.contains_key(&country.name) {
                continue;
            }
            let series = self
                .series
                .shift_remove(country.name.as_str())
                .unwrap_or_default();
            rebuilt.insert(country.name.clone(), series);
        }
        self.series = rebuilt;
    }

    /// Deep copy of the current state: every tracked country in first-tracked
    /// order, samples oldest-first. An empty history yields an empty snapshot.
    pub fn snapshot(&self) -> HistorySnapshot {
        HistorySnapshot {
            series: self
                .series
                .iter()
                .map(|(name, samples)| (name.clone(), samples.iter().cloned().collect()))
                .collect(),
        }
    }
}

/// Immutable copy of the history at one instant.
///
/// Renderers and tests read these; nothing ever mutates one in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HistorySnapshot {
    /// Per-country samples, oldest-first, keyed in first-tracked order.
    pub series: IndexMap<String, Vec<GdpSample>>,
}

impl HistorySnapshot {
    /// Number of countries in the snapshot.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Whether the snapshot holds no countries.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// The most recent sample for `name`, if any.
    pub fn newest(&self, name: &str) -> Option<&GdpSample> {
        self.series.get(name).and_then(|samples| samples.last())
    }
}
