//! World Bank v2 indicator API provider.

pub mod provider;
pub mod response;

pub use provider::WorldBankProvider;
