// src/config.rs

//! Configuration loading utilities.

use std::path::Path;

use crate::error::Result;
use crate::models::Config;

/// Load configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<Config> {
    Config::load(path)
}

/// Load configuration, falling back to defaults if loading fails.
pub fn load_or_default(path: &Path) -> Config {
    Config::load_or_default(path)
}

/// Resolve the bearer token from the configured environment variable.
///
/// An unset or empty variable yields `None`; requests then go out
/// unauthenticated.
pub fn resolve_token(config: &Config) -> Option<String> {
    std::env::var(&config.crawler.token_env)
        .ok()
        .filter(|token| !token.trim().is_empty())
}
