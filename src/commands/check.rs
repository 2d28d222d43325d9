//! `brandhub check-config`.

use anyhow::Result;
use std::path::Path;

use crate::config::Config;

/// Loads and validates configuration, then prints warnings and the effective
/// settings with the API key masked.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or fails validation.
pub fn execute(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;
    let validation = config.validate()?;

    if validation.has_warnings() {
        println!("Warnings:");
        for warning in &validation.warnings {
            println!("  - {warning}");
        }
        println!();
    }

    println!("{}", config.redacted()?);
    println!("Configuration OK");
    Ok(())
}
