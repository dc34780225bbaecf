//! Provider abstraction for economic indicator sources.
//!
//! This module defines the [`IndicatorProvider`] trait, which serves as a
//! unified interface for fetching the latest reported value of an indicator
//! for one country from any datasource (e.g., the World Bank API).
//!
//! Each concrete provider implementation should implement
//! [`IndicatorProvider`] to handle vendor-specific API logic and decoding.
//!
//! The trait is designed for async usage and supports dynamic dispatch
//! (`dyn IndicatorProvider`) so the polling engine can be wired against any
//! source at runtime, including scripted ones in tests.

pub mod errors;
pub mod world_bank;

use async_trait::async_trait;

pub use errors::ProviderError;

/// Trait for fetching the latest indicator observation for one country.
///
/// Implement this trait for each concrete datasource. One call performs one
/// fetch for one country; batching is deliberately out of scope so that a
/// failing country can never take its neighbors down with it.
#[async_trait]
pub trait IndicatorProvider: Send + Sync {
    /// Fetches the most recent reported value for `country_code`.
    ///
    /// # Returns
    ///
    /// * `Ok(f64)` - The latest observation as reported by the source.
    /// * `Err(ProviderError)` - Transport failure, API error reply, or a
    ///   reply with no usable observation. Callers that need a number
    ///   anyway substitute their own fallback.
    async fn latest_value(&self, country_code: &str) -> Result<f64, ProviderError>;
}
