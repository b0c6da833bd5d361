//! Configuration utilities.

/// TOML configuration (`lexgate.toml`) loading and validation.
pub mod toml_config;
