//! Configuration module
//!
//! Builds the engine configuration from the environment and overlays the
//! command-line flags on top.

use anyhow::{Context, Result};
use pipewatch_engine::Config;
use std::time::Duration;

/// Resolves the effective configuration
///
/// Flags win over environment variables, which win over defaults.
pub fn load(api_url: Option<String>, interval_ms: Option<u64>) -> Result<Config> {
    let mut config = Config::from_env().context("Invalid environment configuration")?;

    if let Some(api_url) = api_url {
        config.api_url = api_url;
    }
    if let Some(ms) = interval_ms {
        config = config.with_poll_interval(Duration::from_millis(ms));
    }

    config.validate()?;
    Ok(config)
}
