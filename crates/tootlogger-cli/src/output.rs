//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use std::path::Path;

use tootlogger_core::{Config, RunReport};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print configured accounts (never the access token)
    pub fn print_accounts(&self, config: &Config, path: &Path) {
        match self.format {
            OutputFormat::Human => {
                if config.is_empty() {
                    println!("No accounts configured.");
                } else {
                    for (name, account) in config.iter() {
                        println!(
                            "{} | {} | last_id: {}",
                            name,
                            account.instance,
                            account
                                .last_id
                                .map(|id| id.to_string())
                                .unwrap_or_else(|| "(none)".to_string())
                        );
                    }
                    println!("\n{} account(s)", config.len());
                }
                println!("Config file: {}", path.display());
            }
            OutputFormat::Json => {
                let accounts: Vec<_> = config
                    .iter()
                    .map(|(name, account)| {
                        serde_json::json!({
                            "name": name,
                            "instance": account.instance,
                            "last_id": account.last_id,
                        })
                    })
                    .collect();
                println!(
                    "{}",
                    serde_json::json!({"config_file": path, "accounts": accounts})
                );
            }
            OutputFormat::Quiet => {
                for (name, _) in config.iter() {
                    println!("{}", name);
                }
            }
        }
    }

    /// Print the outcome of a run
    pub fn print_run(&self, report: &RunReport) {
        match self.format {
            OutputFormat::Human => {
                if !report.delivered {
                    print!("{}", report.document);
                    return;
                }
                println!("✓ {}", summary(report));
                for account in &report.accounts {
                    println!("  {}: {} toot(s)", account.name, account.fetched);
                }
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(report).unwrap_or_default()
                );
            }
            OutputFormat::Quiet => {
                if !report.delivered {
                    print!("{}", report.document);
                }
            }
        }
    }
}

/// One-line description of a delivered run
fn summary(report: &RunReport) -> String {
    let total = report.total_fetched();
    if total == 0 {
        format!(
            "Gosh! No toots today, logged an empty journal for {} account(s)",
            report.accounts.len()
        )
    } else {
        format!(
            "Logged {} toot(s) from {} account(s)",
            total,
            report.accounts.len()
        )
    }
}
