//! Stats command - resolve and display resort stats.

use anyhow::Result;
use clap::Args;
use futures::future::join_all;
use liftstat_fetch::{FetchContext, Resolution};
use liftstat_providers::StatsRegistry;
use tracing::{debug, info};

use crate::config::ResortConfig;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the stats command.
#[derive(Args, Default)]
pub struct StatsArgs {
    /// Resort ids to resolve (all known resorts if omitted).
    pub ids: Vec<String>,
}

/// Runs the stats command.
pub async fn run(args: &StatsArgs, cli: &Cli) -> Result<ExitCode> {
    let config = ResortConfig::load_or_default(cli.config.as_deref())?;
    let resorts = config.select(&args.ids)?;
    info!(resorts = resorts.len(), "Resolving stats");

    let dispatcher = StatsRegistry::dispatcher(&config.resorts);
    let ctx = FetchContext::with_settings(config.settings.fetch_settings());
    debug!(?dispatcher, ?ctx, "Dispatcher ready");

    let resolutions: Vec<Resolution> =
        join_all(resorts.iter().map(|resort| dispatcher.resolve(resort, &ctx))).await;
    let available = resolutions.iter().filter(|r| r.is_available()).count();

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            for (resort, resolution) in resorts.iter().zip(&resolutions) {
                println!("{}", formatter.format_resolution(resort, resolution));
                if cli.verbose {
                    for line in formatter.format_attempts(resolution) {
                        println!("{line}");
                    }
                }
            }
            if !cli.quiet && resolutions.len() > 1 {
                println!();
                println!("{}", formatter.format_summary(available, resolutions.len()));
            }
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_resolutions(&resolutions)?);
        }
    }

    Ok(exit_code(available, resolutions.len()))
}

/// Exit code for a run: unavailable only when nothing resolved.
fn exit_code(available: usize, requested: usize) -> ExitCode {
    if requested > 0 && available == 0 {
        ExitCode::Unavailable
    } else {
        ExitCode::Success
    }
}
