//! Lists command handler

use anyhow::{Context, Result};

use tabdo_core::{Config, ListRegistry};

use crate::output::Output;

/// Print the configured lists, marking the default
pub fn show(config: &Config, output: &Output) -> Result<()> {
    let registry = ListRegistry::from_config(config).context("Invalid list configuration")?;
    output.print_lists(registry.entries(), registry.default_list());
    Ok(())
}
