use anyhow::Context;
use sluice_dns_domain::{CliOverrides, Config};

/// Runs before logging is initialized, so failures surface only through
/// the returned error.
pub fn load_config(path: Option<&str>, overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(path, overrides).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}
