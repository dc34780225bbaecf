//! Crate-level documentation for the gdp_tracker library.
//!
//! Polls an indicator datasource for a selected set of countries on a fixed
//! cadence, perturbs each baseline with bounded jitter, and maintains a
//! rolling per-country history that renderers consume as immutable
//! snapshots.

#![deny(missing_docs)]

pub mod config;
pub mod history;
pub mod jitter;
pub mod latest;
pub mod scheduler;
pub mod selection;
