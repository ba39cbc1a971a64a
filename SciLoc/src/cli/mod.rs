//! SciLoc CLI - Command-line interface for Sierra SCI resource tools

pub mod commands;
pub mod progress;

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use commands::Commands;

use crate::config::CodecOptions;

#[derive(Parser)]
#[command(name = "sciloc")]
#[command(about = "SciLoc: Sierra SCI font, message and text tools", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON file with codec defaults (codepages, header fields)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Run the SciLoc CLI
///
/// # Errors
/// Returns an error if the config cannot be loaded or the command fails.
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let options = CodecOptions::load_or_default(cli.config.as_deref())?;
    cli.command.execute(&options)?;

    Ok(())
}
