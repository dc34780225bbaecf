//! Country registry and indicator providers for the GDP polling engine.

pub mod models;
pub mod providers;
pub mod registry;
