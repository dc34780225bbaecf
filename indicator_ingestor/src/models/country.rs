//! Canonical in-memory representation of a tracked country.
//!
//! This struct is the unit every other part of the engine passes around:
//! the registry resolves user input into it, providers take its `code`,
//! and the history keys its series by `name`.

use serde::{Deserialize, Serialize};

/// A country known to the engine.
///
/// This struct is datasource-agnostic; `code` is whatever identifier the
/// active provider expects (ISO-3166 alpha-2 for the World Bank).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    /// Canonical display name (e.g., "United Kingdom").
    pub name: String,

    /// Remote datasource code (e.g., "GB").
    pub code: String,
}

impl Country {
    /// Convenience constructor used by the registry and tests.
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
        }
    }
}
