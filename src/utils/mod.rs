//! Configuration utilities.

/// `parley.toml` loading, environment overrides and validation.
pub mod config;
