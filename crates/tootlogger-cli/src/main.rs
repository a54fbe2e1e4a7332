//! tootlogger CLI
//!
//! Save all your toots from Mastodon as a single journal entry in Day One.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use output::{Output, OutputFormat};

/// Environment variable holding the log filter
const LOG_ENV: &str = "TOOTLOGGER_LOG";

#[derive(Parser)]
#[command(name = "tootlogger")]
#[command(about = "Log your Mastodon toots to Day One")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Config file to use instead of ./tootlogger.toml or ~/.tootlogger.toml
    #[arg(short, long, global = true, env = "TOOTLOGGER_CONFIG")]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// More logging on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Arguments for the default `run` command
    #[command(flatten)]
    run: RunArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
struct RunArgs {
    /// Print the journal instead of logging it; watermarks are not saved
    #[arg(long)]
    dry_run: bool,

    /// Journal program to invoke with `new`
    #[arg(long, env = "TOOTLOGGER_JOURNAL_CLI", default_value = tootlogger_core::delivery::DAYONE_CLI)]
    journal_cli: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch new toots and log them to Day One (default)
    Run(RunArgs),
    /// List configured accounts and their watermarks
    #[command(alias = "ls")]
    Accounts,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match dispatch(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", error_message(&e));
            ExitCode::from(1)
        }
    }
}

fn dispatch(cli: Cli) -> Result<()> {
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_deref();

    match cli.command {
        Some(Commands::Run(args)) => {
            commands::run::run(config_path, &args.journal_cli, args.dry_run, &output)
        }
        None => commands::run::run(config_path, &cli.run.journal_cli, cli.run.dry_run, &output),
        Some(Commands::Accounts) => commands::accounts::list(config_path, &output),
    }
}

/// The single stderr line for a fatal error
fn error_message(error: &anyhow::Error) -> String {
    match recovery_hint(error) {
        Some(hint) => format!("Error: {:#} ({})", error, hint),
        None => format!("Error: {:#}", error),
    }
}

/// Recovery suggestion from the first core error in the chain
fn recovery_hint(error: &anyhow::Error) -> Option<&'static str> {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<tootlogger_core::Error>())
        .and_then(|e| e.recovery_suggestion())
}

/// Log to stderr, filtered by TOOTLOGGER_LOG or the -v count
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env_filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "tootlogger_core={0},tootlogger={0}",
            default_level
        ))
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
