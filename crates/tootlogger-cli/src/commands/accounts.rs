//! Account listing

use std::path::Path;

use anyhow::{Context, Result};

use tootlogger_core::ConfigResult;

use crate::output::Output;

/// Show configured accounts and where they were loaded from
pub fn list(config_path: Option<&Path>, output: &Output) -> Result<()> {
    let loaded = ConfigResult::discover(config_path).context("Failed to load configuration")?;
    output.print_accounts(&loaded.config, &loaded.path);
    Ok(())
}
