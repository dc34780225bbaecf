//! Tracker configuration: parsing, normalization, and loading.
//!
//! This module defines the TOML-backed tracker configuration:
//! - Polling cadence and per-country history capacity
//! - Jitter amplitude
//! - Datasource settings (API root, indicator code, request timeout)
//! - The country table (display name -> datasource code)
//!
//! Key behaviors:
//! - Every field has a default, so an empty file (or no file at all) yields
//!   a working configuration identical to [`TrackerConfig::default`].
//! - Normalization trims names and codes, uppercases codes, and rejects
//!   empty or duplicate entries and out-of-range numeric knobs.
//! - Unknown keys are a parse error (`deny_unknown_fields`), so typos fail
//!   loudly instead of silently polling with defaults.
//!
//! Entrypoints:
//! - Parse + normalize from a TOML string: [`load_config_str`]
//! - Parse + normalize from a file path: [`load_config_path`]

use std::num::NonZeroUsize;
use std::time::Duration;

use anyhow::{Context, bail};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use toml::from_str;

use indicator_ingestor::providers::ProviderError;
use indicator_ingestor::providers::world_bank::provider::{
    DEFAULT_BASE_URL, GDP_CURRENT_USD, WorldBankProvider,
};
use indicator_ingestor::registry::CountryRegistry;

use crate::history::DEFAULT_CAPACITY;
use crate::jitter::DEFAULT_AMPLITUDE;
use crate::scheduler::DEFAULT_CADENCE;

/// Top-level tracker configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct TrackerConfig {
    /// Seconds between poll cycles. Must be at least 1.
    pub poll_interval_secs: u64,

    /// Samples retained per country.
    pub capacity: NonZeroUsize,

    /// Relative half-width of the per-cycle perturbation, in `[0, 1)`.
    pub jitter_amplitude: f64,

    /// Datasource settings.
    pub source: SourceConfig,

    /// Country table: display name -> datasource code, insertion-ordered.
    ///
    /// Defaults to the built-in table of [`CountryRegistry::builtin`].
    pub countries: IndexMap<String, String>,
}

/// Datasource section of the configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct SourceConfig {
    /// API root the provider talks to.
    pub base_url: String,

    /// Indicator code to fetch.
    pub indicator: String,

    /// Per-request timeout in seconds. Must be at least 1.
    pub request_timeout_secs: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: DEFAULT_CADENCE.as_secs(),
            capacity: DEFAULT_CAPACITY,
            jitter_amplitude: DEFAULT_AMPLITUDE,
            source: SourceConfig::default(),
            countries: CountryRegistry::builtin()
                .iter()
                .map(|c| (c.name.clone(), c.code.clone()))
                .collect(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            indicator: GDP_CURRENT_USD.to_string(),
            request_timeout_secs: 10,
        }
    }
}

impl TrackerConfig {
    /// The poll cadence as a [`Duration`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Registry built from the country table, in table order.
    pub fn registry(&self) -> CountryRegistry {
        CountryRegistry::from_entries(
            self.countries
                .iter()
                .map(|(name, code)| (name.clone(), code.clone())),
        )
    }
}

impl SourceConfig {
    /// The request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Provider wired against these settings.
    pub fn provider(&self) -> Result<WorldBankProvider, ProviderError> {
        WorldBankProvider::with_settings(&self.base_url, &self.indicator, self.request_timeout())
    }
}

/// Normalize a configuration in place.
///
/// What normalization does:
/// - Trim `base_url` (also dropping a trailing `/`) and `indicator`
/// - Trim country names; trim + uppercase country codes
/// - Reject empty strings after trimming, duplicate names, an empty table,
///   a zero interval or timeout, and an out-of-range jitter amplitude
pub fn normalize_config(cfg: &mut TrackerConfig) -> anyhow::Result<()> {
    if cfg.poll_interval_secs == 0 {
        bail!("poll_interval_secs must be at least 1");
    }
    if !cfg.jitter_amplitude.is_finite() || !(0.0..1.0).contains(&cfg.jitter_amplitude) {
        bail!(
            "jitter_amplitude must be in [0, 1), got {}",
            cfg.jitter_amplitude
        );
    }
    if cfg.source.request_timeout_secs == 0 {
        bail!("source.request_timeout_secs must be at least 1");
    }

    cfg.source.base_url = cfg.source.base_url.trim().trim_end_matches('/').to_string();
    if cfg.source.base_url.is_empty() {
        bail!("source.base_url cannot be empty after trimming");
    }
    cfg.source.indicator = cfg.source.indicator.trim().to_string();
    if cfg.source.indicator.is_empty() {
        bail!("source.indicator cannot be empty after trimming");
    }

    // Rebuild the country table
    let mut rebuilt: IndexMap<String, String> = IndexMap::new();
    let old = std::mem::take(&mut cfg.countries);

    for (raw_name, raw_code) in old {
        let name = raw_name.trim().to_string();
        if name.is_empty() {
            bail!("country name cannot be empty after trimming");
        }
        let code = raw_code.trim().to_uppercase();
        if code.is_empty() {
            bail!("country code cannot be empty after trimming (name: {name})");
        }
        if rebuilt.insert(name.clone(), code).is_some() {
            bail!("duplicate country name after trimming: {name}");
        }
    }

    if rebuilt.is_empty() {
        bail!("the countries table cannot be empty");
    }
    cfg.countries = rebuilt;

    Ok(())
}

/// Parse and normalize a tracker configuration from a TOML string.
///
/// Errors:
/// - TOML parse failures (including unknown keys)
/// - Normalization errors (see [`normalize_config`])
pub fn load_config_str(toml_str: &str) -> anyhow::Result<TrackerConfig> {
    let mut cfg: TrackerConfig = from_str(toml_str).context("failed to parse tracker TOML")?;
    normalize_config(&mut cfg).context("normalize_config failed")?;
    Ok(cfg)
}

/// Read a tracker TOML file from disk, parse, and normalize it.
///
/// See [`load_config_str`] for details.
pub fn load_config_path(path: impl AsRef<std::path::Path>) -> anyhow::Result<TrackerConfig> {
    let text = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("read config file {}", path.as_ref().display()))?;
    load_config_str(&text)
}
