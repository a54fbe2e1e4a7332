//! The default command: fetch, render, deliver, save

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{debug, info};

use tootlogger_core::{
    run_once, ConfigResult, DayOne, FetchSettings, MastodonClient, RunOptions,
};

use crate::output::Output;

/// Run the pipeline once
pub fn run(
    config_path: Option<&Path>,
    journal_cli: &str,
    dry_run: bool,
    output: &Output,
) -> Result<()> {
    let loaded = ConfigResult::discover(config_path).context("Failed to load configuration")?;
    info!(
        "Loaded {} account(s) from {}",
        loaded.config.len(),
        loaded.path.display()
    );

    let sink = DayOne::with_program(journal_cli);
    let client =
        MastodonClient::new(FetchSettings::default()).context("Failed to create HTTP client")?;

    // Resolved once so every toot in the run uses the same zone.
    let zone = Local;
    debug!("Using local time zone, dry run: {}", dry_run);

    let report = run_once(loaded, &client, &sink, Some(&zone), RunOptions { dry_run })?;

    output.print_run(&report);
    Ok(())
}
