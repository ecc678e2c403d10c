// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! liftstat CLI - live lift, trail and snow-depth stats from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Stats for every known resort
//! liftstat
//!
//! # Stats for specific resorts
//! liftstat stats alta taos
//!
//! # JSON output
//! liftstat --format json --pretty stats bear-mountain
//!
//! # Show every strategy attempt
//! liftstat -v stats snowmass
//!
//! # List resorts and their resolution plans
//! liftstat resorts
//!
//! # Use another resort file
//! liftstat --config ./resorts.json stats
//! ```

mod commands;
mod config;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{resorts, stats};

// ============================================================================
// CLI Definition
// ============================================================================

/// liftstat CLI - ski resort operating stats.
#[derive(Parser)]
#[command(name = "liftstat")]
#[command(about = "Live lift, trail and snow-depth stats for ski resorts")]
#[command(long_about = r#"
liftstat resolves open/total lifts and trails, groomed trails and base
depth for ski resorts. Each resort is tried through its own extractor, then
any provider feed recognized from its endpoints, then a generic fetch of
its declared stats endpoint.

Resorts come from the built-in list and from the resort file
(<config dir>/liftstat/resorts.json, or --config).

Examples:
  liftstat                          # All known resorts
  liftstat stats alta taos          # Selected resorts
  liftstat --format json stats      # JSON keyed by resort id
  liftstat resorts                  # Resolution plans
"#)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run. If none, runs 'stats' for every resort.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Resort configuration file.
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose output (strategy attempts and debug logs).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (no logs, no summary line).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Resolve stats (default if no command specified).
    #[command(visible_alias = "s")]
    Stats(stats::StatsArgs),

    /// List known resorts and their resolution plans.
    #[command(visible_alias = "r")]
    Resorts,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// Every requested resort was unavailable.
    Unavailable = 2,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("liftstat=debug,info")
    } else {
        EnvFilter::new("liftstat=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Some(Commands::Stats(args)) => stats::run(args, &cli).await,
        Some(Commands::Resorts) => resorts::run(&cli).map(|()| ExitCode::Success),
        None => stats::run(&stats::StatsArgs::default(), &cli).await,
    };

    match result {
        Ok(ExitCode::Success) => Ok(()),
        Ok(code) => std::process::exit(code as i32),
        Err(e) => {
            if !cli.quiet {
                eprintln!("Error: {e:#}");
            }
            std::process::exit(ExitCode::Error as i32);
        }
    }
}
