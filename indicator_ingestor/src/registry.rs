//! Country registry: canonical names, datasource codes, and lookup.
//!
//! Key behaviors:
//! - Lookup input is trimmed and title-cased before the table is consulted,
//!   so "india", " India " and "INDIA" all resolve to the same entry.
//! - Iteration order is registration order (the registry is backed by an
//!   [`IndexMap`]), which downstream code relies on when it seeds the
//!   tracked set.
//!
//! Entrypoints:
//! - The stock ten-country table: [`CountryRegistry::builtin`]
//! - A caller-supplied table (e.g., from config): [`CountryRegistry::from_entries`]

use indexmap::IndexMap;
use thiserror::Error;

use crate::models::country::Country;

/// Error returned when a requested name does not resolve to a known country.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The name, after normalization, matched nothing in the table.
    ///
    /// Carries the raw input (pre-normalization) so callers can echo back
    /// exactly what was asked for.
    #[error("unknown country: {name}")]
    UnknownCountry {
        /// The raw requested name.
        name: String,
    },
}

/// Immutable, insertion-ordered table of known countries.
#[derive(Debug, Clone)]
pub struct CountryRegistry {
    entries: IndexMap<String, Country>,
}

/// The stock name/code table, in registration order.
const BUILTIN: &[(&str, &str)] = &[
    ("India", "IN"),
    ("United States", "US"),
    ("China", "CN"),
    ("Japan", "JP"),
    ("Germany", "DE"),
    ("United Kingdom", "GB"),
    ("France", "FR"),
    ("Brazil", "BR"),
    ("South Africa", "ZA"),
    ("Australia", "AU"),
];

impl CountryRegistry {
    /// Registry preloaded with the stock ten-country table.
    pub fn builtin() -> Self {
        Self::from_entries(BUILTIN.iter().map(|(n, c)| (n.to_string(), c.to_string())))
    }

    /// Build a registry from `(name, code)` pairs, preserving order.
    ///
    /// Each name is stored under its canonical (trimmed, title-cased) form;
    /// a later pair with the same canonical name replaces the earlier one.
    pub fn from_entries(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut map = IndexMap::new();
        for (name, code) in entries {
            let canonical = title_case(name.trim());
            map.insert(canonical.clone(), Country::new(canonical, code));
        }
        Self { entries: map }
    }

    /// Resolve a requested name to its registry entry.
    ///
    /// The input is trimmed and title-cased first, so lookup is insensitive
    /// to case and surrounding whitespace.
    ///
    /// Errors:
    /// - [`RegistryError::UnknownCountry`] carrying the raw input when the
    ///   normalized name is not in the table (including empty input).
    pub fn resolve(&self, raw: &str) -> Result<&Country, RegistryError> {
        let canonical = title_case(raw.trim());
        self.entries
            .get(&canonical)
            .ok_or_else(|| RegistryError::UnknownCountry {
                name: raw.to_string(),
            })
    }

    /// Canonical names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    /// All entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Country> {
        self.entries.values()
    }

    /// Number of registered countries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry holds no countries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Title-case a name: first alphabetic character of every word uppercased,
/// the rest lowercased. Any non-alphabetic character starts a new word, so
/// "united kingdom" -> "United Kingdom" and "SOUTH AFRICA" -> "South Africa".
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_boundary = true;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if at_boundary {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_boundary = false;
        } else {
            out.push(ch);
            at_boundary = true;
        }
    }
    out
}
